//! Builds store backends from application configuration.

use std::sync::Arc;

use merchia_core::{AppConfig, StoreBackend};

use crate::memory::{MemoryMediaStore, MemoryProductStore};
use crate::rest::RestStore;
use crate::traits::{MediaStore, ProductStore, StoreError, StoreResult};

/// Handles to the configured store backends. The media and product handles
/// may point at the same underlying client.
#[derive(Clone)]
pub struct Stores {
    pub media: Arc<dyn MediaStore>,
    pub products: Arc<dyn ProductStore>,
}

/// Creates store handles for the backend named in `config`.
pub fn create_stores(config: &AppConfig) -> StoreResult<Stores> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store backend");
            Ok(Stores {
                media: Arc::new(MemoryMediaStore::new()),
                products: Arc::new(MemoryProductStore::new()),
            })
        }
        StoreBackend::Rest => {
            let base_url = config.api_base_url.as_deref().ok_or_else(|| {
                StoreError::ConfigError("api base url is not configured".to_string())
            })?;
            let token = config
                .api_token
                .as_deref()
                .ok_or_else(|| StoreError::ConfigError("api token is not configured".to_string()))?;

            tracing::info!(base_url = base_url, "Using rest store backend");
            let rest = Arc::new(RestStore::new(base_url, token)?);
            Ok(Stores {
                media: rest.clone(),
                products: rest,
            })
        }
    }
}
