//! Vartha Core
//!
//! Core types and utilities shared across Vartha components.
//!
//! This crate provides:
//! - Error types and result handling
//! - The static news category table with English and Telugu display names
//! - Classification result types returned by the inference pipeline

pub mod category;
pub mod error;
pub mod types;

pub use category::{Category, CategoryInfo, CATEGORIES};
pub use error::{Error, Result};
pub use types::{ClassificationResult, PredictionSource};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::category::{Category, CategoryInfo, CATEGORIES};
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassificationResult, PredictionSource};
}
