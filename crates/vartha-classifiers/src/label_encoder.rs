//! Ordinal mapping between category codes and model output indices

use crate::model_loader::load_json;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vartha_core::{Error, Result, CATEGORIES};

/// Fitted label encoder: `classes[i]` is the code for output index `i`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Create an encoder from an ordered class list
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(Error::artifact("label encoder has no classes"));
        }
        Ok(Self { classes })
    }

    /// Encoder over the built-in category table
    pub fn from_categories() -> Self {
        Self {
            classes: CATEGORIES.iter().map(|c| c.code().to_string()).collect(),
        }
    }

    /// Load an encoder from a JSON artifact (`{"classes": [...]}`)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let encoder: LabelEncoder = load_json(path.as_ref())?;
        Self::new(encoder.classes)
    }

    /// Ordered class codes
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether there are no classes
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Output index for a class code
    pub fn transform(&self, code: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == code)
    }

    /// Class code for an output index
    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Whether the classes are exactly the built-in category codes
    pub fn matches_categories(&self) -> bool {
        let mut codes: Vec<&str> = self.classes.iter().map(String::as_str).collect();
        codes.sort_unstable();
        codes.dedup();
        codes.len() == self.classes.len()
            && codes == CATEGORIES.iter().map(|c| c.code()).collect::<Vec<_>>()
    }
}
