//! Tracks which products have an image upload in flight.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use merchia_core::models::ProductId;

use crate::job::UploadPhase;

/// A live upload tracked by the registry.
#[derive(Debug, Clone)]
pub struct ActiveUpload {
    pub local_uri: String,
    pub phase: UploadPhase,
}

/// Keyed table of in-flight uploads, one slot per product.
///
/// Cloning shares the underlying table. The lock is held only for the
/// duration of a single map operation, never across an await point.
#[derive(Clone, Default)]
pub struct UploadRegistry {
    active: Arc<Mutex<HashMap<ProductId, ActiveUpload>>>,
}

impl UploadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot for `product_id`, starting in the uploading phase.
    /// Returns false when an upload is already in flight for that product.
    pub fn try_claim(&self, product_id: ProductId, local_uri: &str) -> bool {
        let mut active = self.active.lock().unwrap();
        match active.entry(product_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(ActiveUpload {
                    local_uri: local_uri.to_string(),
                    phase: UploadPhase::Uploading,
                });
                true
            }
        }
    }

    /// Records a phase transition for a live upload. Releasing slots is
    /// separate; a transition for a released slot is a no-op.
    pub fn set_phase(&self, product_id: ProductId, phase: UploadPhase) {
        if let Some(upload) = self.active.lock().unwrap().get_mut(&product_id) {
            upload.phase = phase;
        }
    }

    /// Releases the slot for `product_id`.
    pub fn release(&self, product_id: ProductId) {
        self.active.lock().unwrap().remove(&product_id);
    }

    /// Whether an upload is in flight for this product.
    pub fn is_uploading_for_product(&self, product_id: ProductId) -> bool {
        self.active.lock().unwrap().contains_key(&product_id)
    }

    /// Whether any upload is in flight.
    pub fn is_busy(&self) -> bool {
        !self.active.lock().unwrap().is_empty()
    }

    /// Phase of the live upload for this product, if any.
    pub fn phase_for_product(&self, product_id: ProductId) -> Option<UploadPhase> {
        self.active
            .lock()
            .unwrap()
            .get(&product_id)
            .map(|upload| upload.phase)
    }
}
