//! Upload job types and lifecycle phases.

use std::fmt;

use merchia_core::models::{MediaDescriptor, ProductId};

/// Live phase of an upload job.
///
/// Jobs move from `Uploading` to `Attaching`; terminal outcomes are reported
/// through an [`UploadEvent`] rather than a phase, at which point the job no
/// longer appears in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    /// Sending the local file to the site media library.
    Uploading,
    /// Rewriting the product's image list with the uploaded media.
    Attaching,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadPhase::Uploading => write!(f, "uploading"),
            UploadPhase::Attaching => write!(f, "attaching"),
        }
    }
}

/// A validated upload accepted into the pipeline.
#[derive(Debug)]
pub struct UploadJob {
    pub product_id: ProductId,
    pub descriptor: MediaDescriptor,
}

/// Terminal notification for an upload attempt on a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadEvent {
    pub product_id: ProductId,
    pub is_error: bool,
}
