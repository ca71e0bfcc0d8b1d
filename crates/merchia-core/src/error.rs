use thiserror::Error;

/// Errors produced by core domain operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The local media reference could not be resolved to a readable file.
    #[error("Invalid media reference: {0}")]
    InvalidMediaReference(String),

    /// The referenced file is not a media type the storefront accepts.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
}
