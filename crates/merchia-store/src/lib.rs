//! Merchia Store Library
//!
//! Storefront access behind trait seams: a media library store, a product
//! catalog store, and the site context they are scoped by. Ships a REST
//! backend for the storefront management API and an in-memory backend for
//! tests and local development.

pub mod factory;
pub mod memory;
pub mod rest;
pub mod traits;

pub use factory::{create_stores, Stores};
pub use memory::{MemoryMediaStore, MemoryProductStore, RecordingImageCache, UploadMode};
pub use rest::RestStore;
pub use traits::{
    FixedSite, ImageCache, MediaStore, NoOpImageCache, ProductStore, SiteContext, StoreError,
    StoreResult,
};
