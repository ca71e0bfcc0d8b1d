//! Merchia Media Library
//!
//! Two-phase product image upload pipeline: local images are uploaded to the
//! site media library, then attached to the product's image list in the
//! primary slot. Completion is reported through broadcast events, and
//! per-product in-flight state is queryable while jobs run.

pub mod error;
pub mod job;
pub mod registry;
pub mod service;

pub use error::UploadError;
pub use job::{UploadEvent, UploadJob, UploadPhase};
pub use registry::{ActiveUpload, UploadRegistry};
pub use service::{UploadService, UploadServiceConfig};
