//! Store trait definitions and error types.
//!
//! These traits are the seam between the upload pipeline and whichever
//! storefront backend is configured. Backends live in this crate; consumers
//! hold them as `Arc<dyn MediaStore>` / `Arc<dyn ProductStore>`.

use async_trait::async_trait;
use thiserror::Error;

use merchia_core::models::{Image, MediaDescriptor, Product, ProductId, SiteId, UploadedMedia};

/// Errors returned by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Upload cancelled")]
    Cancelled,

    #[error("Update failed: {0}")]
    UpdateFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Store configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::RequestFailed(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Media library access on the storefront.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Uploads a local media file to the site media library.
    async fn upload_media(
        &self,
        site_id: SiteId,
        descriptor: &MediaDescriptor,
    ) -> StoreResult<UploadedMedia>;
}

/// Product catalog access on the storefront.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetches a product by its remote id. `Ok(None)` means the product does
    /// not exist on the site.
    async fn fetch_product(
        &self,
        site_id: SiteId,
        product_id: ProductId,
    ) -> StoreResult<Option<Product>>;

    /// Replaces the product image list with `images`, in order.
    async fn update_product_images(
        &self,
        site_id: SiteId,
        product_id: ProductId,
        images: Vec<Image>,
    ) -> StoreResult<()>;
}

/// Provides the site that remote calls are scoped to.
pub trait SiteContext: Send + Sync {
    fn selected_site(&self) -> SiteId;
}

/// Site context fixed at construction time.
#[derive(Debug, Clone)]
pub struct FixedSite(pub SiteId);

impl SiteContext for FixedSite {
    fn selected_site(&self) -> SiteId {
        self.0
    }
}

/// Hook notified when a product's image set changed remotely, so cached
/// image lookups can be refreshed.
#[async_trait]
pub trait ImageCache: Send + Sync {
    async fn refresh_product(&self, product_id: ProductId);
}

/// No-op image cache for deployments without one.
pub struct NoOpImageCache;

#[async_trait]
impl ImageCache for NoOpImageCache {
    async fn refresh_product(&self, _product_id: ProductId) {}
}
