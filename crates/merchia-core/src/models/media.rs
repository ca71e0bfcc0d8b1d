//! Local media descriptors and uploaded media.
//!
//! A [`MediaDescriptor`] is built from a device-local image reference before
//! anything is sent to the storefront; an [`UploadedMedia`] is what the media
//! library reports back once the upload lands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::CoreError;

use super::ids::{MediaId, ProductId, SiteId};
use super::product::Image;

/// A local image staged for upload to the storefront media library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Local identity of this upload attempt, used for log correlation.
    pub local_id: Uuid,
    pub site_id: SiteId,
    /// Product the media will be attached to once uploaded.
    pub product_id: ProductId,
    pub file_path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    /// Whether EXIF location data is removed before upload.
    pub strip_location: bool,
}

impl MediaDescriptor {
    /// Resolves a local URI into an upload descriptor.
    ///
    /// Accepts `file://` URIs and plain filesystem paths. Fails when the
    /// reference is empty, uses another scheme, names no file, points at a
    /// file that does not exist, or has an extension outside the accepted
    /// image types.
    pub fn from_local_uri(
        site_id: SiteId,
        product_id: ProductId,
        local_uri: &str,
        strip_location: bool,
    ) -> Result<Self, CoreError> {
        let trimmed = local_uri.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidMediaReference(
                "empty local uri".to_string(),
            ));
        }

        let file_path = if let Some(path) = trimmed.strip_prefix("file://") {
            PathBuf::from(path)
        } else if trimmed.contains("://") {
            return Err(CoreError::InvalidMediaReference(format!(
                "unsupported uri scheme in {}",
                trimmed
            )));
        } else {
            PathBuf::from(trimmed)
        };

        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                CoreError::InvalidMediaReference(format!("no file name in {}", trimmed))
            })?;

        if !file_path.exists() {
            return Err(CoreError::InvalidMediaReference(format!(
                "file does not exist: {}",
                file_path.display()
            )));
        }

        let mime_type = mime_type_for(&file_path).ok_or_else(|| {
            CoreError::UnsupportedMediaType(
                file_path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            )
        })?;

        Ok(MediaDescriptor {
            local_id: Uuid::new_v4(),
            site_id,
            product_id,
            file_path,
            file_name,
            mime_type: mime_type.to_string(),
            strip_location,
        })
    }
}

fn mime_type_for(path: &Path) -> Option<&'static str> {
    match path
        .extension()?
        .to_str()?
        .to_ascii_lowercase()
        .as_str()
    {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Media library entry reported back after a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedMedia {
    pub media_id: MediaId,
    pub file_name: String,
    pub url: String,
    pub alt: String,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedMedia {
    /// Converts this media library entry into a product image entry.
    pub fn to_image(&self) -> Image {
        Image {
            id: self.media_id,
            name: self.file_name.clone(),
            source: self.url.clone(),
            date_created: self.uploaded_at,
        }
    }
}
