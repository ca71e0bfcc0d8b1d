//! Data models for the application
//!
//! This module contains all data structures used throughout the application,
//! organized by domain. Each sub-module represents a specific feature area.

mod ids;
mod media;
mod product;
mod product_enums;
mod product_record;

// Re-export all models for convenient imports
pub use ids::*;
pub use media::*;
pub use product::*;
pub use product_enums::*;
pub use product_record::*;
