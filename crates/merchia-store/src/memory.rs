//! In-memory store backends for tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use merchia_core::models::{
    Image, MediaDescriptor, MediaId, Product, ProductId, SiteId, UploadedMedia,
};

use crate::traits::{ImageCache, MediaStore, ProductStore, StoreError, StoreResult};

/// Outcome applied to uploads submitted to a [`MemoryMediaStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    Succeed,
    Fail,
    Cancel,
}

/// Media store that keeps uploads in memory.
pub struct MemoryMediaStore {
    mode: Mutex<UploadMode>,
    next_media_id: AtomicI64,
    uploads: Mutex<Vec<MediaDescriptor>>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self {
            mode: Mutex::new(UploadMode::Succeed),
            next_media_id: AtomicI64::new(1000),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Sets the outcome for subsequent uploads.
    pub fn set_mode(&self, mode: UploadMode) {
        *self.mode.lock().unwrap() = mode;
    }

    /// Number of uploads submitted so far, including rejected ones.
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    /// Descriptors submitted so far (for test assertions).
    pub fn uploads(&self) -> Vec<MediaDescriptor> {
        self.uploads.lock().unwrap().clone()
    }
}

impl Default for MemoryMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload_media(
        &self,
        site_id: SiteId,
        descriptor: &MediaDescriptor,
    ) -> StoreResult<UploadedMedia> {
        self.uploads.lock().unwrap().push(descriptor.clone());

        match *self.mode.lock().unwrap() {
            UploadMode::Fail => Err(StoreError::UploadFailed(
                "upload rejected by media store".to_string(),
            )),
            UploadMode::Cancel => Err(StoreError::Cancelled),
            UploadMode::Succeed => {
                let media_id = MediaId(self.next_media_id.fetch_add(1, Ordering::SeqCst));
                Ok(UploadedMedia {
                    media_id,
                    file_name: descriptor.file_name.clone(),
                    url: format!(
                        "https://example.com/media/{}/{}",
                        site_id, descriptor.file_name
                    ),
                    alt: String::new(),
                    uploaded_at: Utc::now(),
                })
            }
        }
    }
}

/// Product store that keeps the catalog in memory.
pub struct MemoryProductStore {
    products: Mutex<HashMap<ProductId, Product>>,
    fail_image_updates: AtomicBool,
    image_updates: Mutex<Vec<(ProductId, Vec<Image>)>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(HashMap::new()),
            fail_image_updates: AtomicBool::new(false),
            image_updates: Mutex::new(Vec::new()),
        }
    }

    /// Seeds or replaces a product in the catalog.
    pub fn insert_product(&self, product: Product) {
        self.products
            .lock()
            .unwrap()
            .insert(product.remote_id, product);
    }

    /// Current state of a product (for test assertions).
    pub fn product(&self, product_id: ProductId) -> Option<Product> {
        self.products.lock().unwrap().get(&product_id).cloned()
    }

    /// Makes subsequent image updates fail.
    pub fn set_fail_image_updates(&self, fail: bool) {
        self.fail_image_updates.store(fail, Ordering::SeqCst);
    }

    /// Image update calls received so far (for test assertions).
    pub fn image_updates(&self) -> Vec<(ProductId, Vec<Image>)> {
        self.image_updates.lock().unwrap().clone()
    }
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn fetch_product(
        &self,
        _site_id: SiteId,
        product_id: ProductId,
    ) -> StoreResult<Option<Product>> {
        Ok(self.products.lock().unwrap().get(&product_id).cloned())
    }

    async fn update_product_images(
        &self,
        _site_id: SiteId,
        product_id: ProductId,
        images: Vec<Image>,
    ) -> StoreResult<()> {
        if self.fail_image_updates.load(Ordering::SeqCst) {
            return Err(StoreError::UpdateFailed(
                "image update rejected by product store".to_string(),
            ));
        }

        let mut products = self.products.lock().unwrap();
        let product = products
            .get_mut(&product_id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", product_id)))?;

        product.first_image_url = images.first().map(|image| image.source.clone());
        product.images = images.clone();
        drop(products);

        self.image_updates
            .lock()
            .unwrap()
            .push((product_id, images));
        Ok(())
    }
}

/// Image cache that records refresh requests.
pub struct RecordingImageCache {
    refreshed: Mutex<Vec<ProductId>>,
}

impl RecordingImageCache {
    pub fn new() -> Self {
        Self {
            refreshed: Mutex::new(Vec::new()),
        }
    }

    /// Products whose cached images were marked for refresh.
    pub fn refreshed(&self) -> Vec<ProductId> {
        self.refreshed.lock().unwrap().clone()
    }
}

impl Default for RecordingImageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageCache for RecordingImageCache {
    async fn refresh_product(&self, product_id: ProductId) {
        self.refreshed.lock().unwrap().push(product_id);
    }
}
