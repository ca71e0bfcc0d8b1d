use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use merchia_core::models::{
    MediaDescriptor, Product, ProductId, ProductRecord, SiteId, UploadedMedia,
};
use merchia_core::telemetry;
use merchia_media::{UploadService, UploadServiceConfig};
use merchia_store::{
    FixedSite, MediaStore, MemoryMediaStore, MemoryProductStore, RecordingImageCache, StoreResult,
    UploadMode,
};

pub const TEST_SITE: SiteId = SiteId(1);

/// A service wired to in-memory backends, plus handles to inspect them.
pub struct TestHarness {
    pub service: UploadService,
    pub media: Arc<MemoryMediaStore>,
    pub products: Arc<MemoryProductStore>,
    pub cache: Arc<RecordingImageCache>,
    image_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Writes a local image file and returns its path as an upload reference.
    pub fn local_image(&self, name: &str) -> String {
        let path = self.image_dir.path().join(name);
        std::fs::write(&path, b"image bytes").unwrap();
        path.to_string_lossy().into_owned()
    }

    pub fn fail_uploads(&self) {
        self.media.set_mode(UploadMode::Fail);
    }

    pub fn cancel_uploads(&self) {
        self.media.set_mode(UploadMode::Cancel);
    }
}

pub fn setup_harness() -> TestHarness {
    setup_harness_with_config(UploadServiceConfig::default())
}

pub fn setup_harness_with_config(config: UploadServiceConfig) -> TestHarness {
    let _ = telemetry::init_telemetry();

    let media = Arc::new(MemoryMediaStore::new());
    let products = Arc::new(MemoryProductStore::new());
    let cache = Arc::new(RecordingImageCache::new());

    let service = UploadService::new(
        media.clone(),
        products.clone(),
        cache.clone(),
        Arc::new(FixedSite(TEST_SITE)),
        config,
    );

    TestHarness {
        service,
        media,
        products,
        cache,
        image_dir: tempfile::tempdir().unwrap(),
    }
}

/// Media store that parks each upload until a permit is released, so tests
/// can hold a job in the uploading phase.
pub struct GatedMediaStore {
    inner: MemoryMediaStore,
    gate: Semaphore,
    arrivals: AtomicUsize,
}

impl GatedMediaStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryMediaStore::new(),
            gate: Semaphore::new(0),
            arrivals: AtomicUsize::new(0),
        }
    }

    /// Lets one parked upload proceed.
    pub fn release_one(&self) {
        self.gate.add_permits(1);
    }

    pub fn upload_count(&self) -> usize {
        self.inner.upload_count()
    }

    /// Waits until `n` uploads have reached the gate.
    pub async fn wait_for_arrivals(&self, n: usize) {
        while self.arrivals.load(Ordering::SeqCst) < n {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl MediaStore for GatedMediaStore {
    async fn upload_media(
        &self,
        site_id: SiteId,
        descriptor: &MediaDescriptor,
    ) -> StoreResult<UploadedMedia> {
        self.arrivals.fetch_add(1, Ordering::SeqCst);
        match self.gate.acquire().await {
            Ok(permit) => permit.forget(),
            Err(_) => return Err(merchia_store::StoreError::Cancelled),
        }
        self.inner.upload_media(site_id, descriptor).await
    }
}

/// A harness whose media store parks uploads behind a gate.
pub struct GatedHarness {
    pub service: UploadService,
    pub media: Arc<GatedMediaStore>,
    pub products: Arc<MemoryProductStore>,
    pub cache: Arc<RecordingImageCache>,
    image_dir: tempfile::TempDir,
}

impl GatedHarness {
    pub fn local_image(&self, name: &str) -> String {
        let path = self.image_dir.path().join(name);
        std::fs::write(&path, b"image bytes").unwrap();
        path.to_string_lossy().into_owned()
    }
}

pub fn setup_gated_harness_with_config(config: UploadServiceConfig) -> GatedHarness {
    let _ = telemetry::init_telemetry();

    let media = Arc::new(GatedMediaStore::new());
    let products = Arc::new(MemoryProductStore::new());
    let cache = Arc::new(RecordingImageCache::new());

    let service = UploadService::new(
        media.clone(),
        products.clone(),
        cache.clone(),
        Arc::new(FixedSite(TEST_SITE)),
        config,
    );

    GatedHarness {
        service,
        media,
        products,
        cache,
        image_dir: tempfile::tempdir().unwrap(),
    }
}

pub fn setup_gated_harness() -> GatedHarness {
    setup_gated_harness_with_config(UploadServiceConfig::default())
}

/// Builds a product with `image_count` existing images (ids 10, 11, ...).
pub fn seeded_product(id: i64, image_count: usize) -> Product {
    let entries: Vec<String> = (0..image_count)
        .map(|i| {
            format!(
                r#"{{"id":{},"name":"existing-{}","src":"https://example.com/existing-{}.jpg","alt":""}}"#,
                10 + i as i64,
                i,
                i
            )
        })
        .collect();

    ProductRecord {
        remote_product_id: id,
        name: format!("Product {}", id),
        date_created: "2023-05-17T10:00:00".to_string(),
        images: format!("[{}]", entries.join(",")),
        ..ProductRecord::default()
    }
    .to_product()
}

/// Shorthand for ids used across the flow tests.
pub fn product_id(id: i64) -> ProductId {
    ProductId(id)
}
