use thiserror::Error;

use merchia_core::models::ProductId;
use merchia_core::CoreError;
use merchia_store::StoreError;

use crate::job::UploadPhase;

/// Errors surfaced by the upload pipeline.
///
/// The first two and the last two variants are returned synchronously from
/// job submission; the rest terminate a running job and are reported through
/// its completion event.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Missing local image reference for product {0}")]
    MissingLocalReference(ProductId),

    #[error("Failed to prepare media for upload: {0}")]
    Descriptor(#[from] CoreError),

    #[error("Media upload failed: {0}")]
    Upload(#[source] StoreError),

    #[error("Media upload cancelled")]
    Cancelled,

    #[error("Product {0} no longer exists on the site")]
    ProductNotFound(ProductId),

    #[error("Failed to attach media to product: {0}")]
    Attach(#[source] StoreError),

    #[error("Timed out while {0}")]
    TimedOut(UploadPhase),

    #[error("Upload already in progress for product {0}")]
    AlreadyUploading(ProductId),

    #[error("Upload service is not running")]
    ServiceClosed,
}
