//! Merchia Core Library
//!
//! Shared foundation for the Merchia workspace: the product domain model and
//! its change detection, media descriptors, wire-record mapping, application
//! configuration, error types, and telemetry setup.

pub mod config;
pub mod error;
pub mod html;
pub mod models;
pub mod telemetry;

// Re-export commonly used types
pub use config::{AppConfig, StoreBackend};
pub use error::CoreError;
