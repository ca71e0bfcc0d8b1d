//! Storefront management REST API backend.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use merchia_core::models::{
    parse_wire_date, Image, MediaDescriptor, MediaId, Product, ProductId, ProductRecord, SiteId,
    UploadedMedia,
};

use crate::traits::{MediaStore, ProductStore, StoreError, StoreResult};

/// REST backend speaking to a storefront management API.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    id: i64,
    #[serde(default)]
    file_name: String,
    url: String,
    #[serde(default)]
    alt: String,
    #[serde(default)]
    uploaded_gmt: String,
}

#[derive(Serialize)]
struct ImageBody {
    id: i64,
    name: String,
    src: String,
    alt: String,
}

impl RestStore {
    pub fn new(base_url: &str, token: &str) -> StoreResult<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(StoreError::ConfigError(format!(
                "invalid api base url: {}",
                base_url
            )));
        }
        if token.is_empty() {
            return Err(StoreError::ConfigError("api token is empty".to_string()));
        }

        Ok(RestStore {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }
}

#[async_trait]
impl MediaStore for RestStore {
    async fn upload_media(
        &self,
        site_id: SiteId,
        descriptor: &MediaDescriptor,
    ) -> StoreResult<UploadedMedia> {
        let data = tokio::fs::read(&descriptor.file_path).await.map_err(|e| {
            StoreError::UploadFailed(format!(
                "failed to read {}: {}",
                descriptor.file_path.display(),
                e
            ))
        })?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let part = Part::bytes(data)
            .file_name(descriptor.file_name.clone())
            .mime_str(&descriptor.mime_type)
            .map_err(|e| StoreError::UploadFailed(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("post", descriptor.product_id.to_string())
            .text("strip_location", descriptor.strip_location.to_string());

        let response = self
            .authorize(
                self.client
                    .post(self.url(&format!("/sites/{}/media", site_id))),
            )
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                media_id = %descriptor.local_id,
                product_id = %descriptor.product_id,
                status = %status,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Media upload failed"
            );
            return Err(StoreError::UploadFailed(format!(
                "status {}: {}",
                status, error_text
            )));
        }

        let payload: MediaUploadResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            media_id = %descriptor.local_id,
            remote_media_id = payload.id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Media upload successful"
        );

        Ok(UploadedMedia {
            media_id: MediaId(payload.id),
            file_name: if payload.file_name.is_empty() {
                descriptor.file_name.clone()
            } else {
                payload.file_name
            },
            url: payload.url,
            alt: payload.alt,
            uploaded_at: parse_wire_date(&payload.uploaded_gmt).unwrap_or_else(Utc::now),
        })
    }
}

#[async_trait]
impl ProductStore for RestStore {
    async fn fetch_product(
        &self,
        site_id: SiteId,
        product_id: ProductId,
    ) -> StoreResult<Option<Product>> {
        let start = std::time::Instant::now();

        let response = self
            .authorize(
                self.client
                    .get(self.url(&format!("/sites/{}/products/{}", site_id, product_id))),
            )
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::RequestFailed(format!(
                "status {}: {}",
                status, error_text
            )));
        }

        let record: ProductRecord = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            product_id = %product_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Product fetched"
        );

        Ok(Some(record.to_product()))
    }

    async fn update_product_images(
        &self,
        site_id: SiteId,
        product_id: ProductId,
        images: Vec<Image>,
    ) -> StoreResult<()> {
        let start = std::time::Instant::now();

        let body: Vec<ImageBody> = images
            .iter()
            .map(|image| ImageBody {
                id: image.id.0,
                name: image.name.clone(),
                src: image.source.clone(),
                alt: String::new(),
            })
            .collect();

        let response = self
            .authorize(
                self.client
                    .put(self.url(&format!("/sites/{}/products/{}", site_id, product_id))),
            )
            .json(&serde_json::json!({ "images": body }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                product_id = %product_id,
                status = %status,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Product image update failed"
            );
            return Err(StoreError::UpdateFailed(format!(
                "status {}: {}",
                status, error_text
            )));
        }

        tracing::info!(
            product_id = %product_id,
            image_count = images.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Product images updated"
        );

        Ok(())
    }
}
