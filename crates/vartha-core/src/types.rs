//! Core types for Vartha

use crate::category::CategoryInfo;
use std::collections::BTreeMap;

/// Which path produced a classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionSource {
    /// Averaged output of the named models
    Ensemble { models: Vec<String> },
    /// Keyword heuristic, used when no model produced a usable vector
    Fallback,
}

impl PredictionSource {
    /// Short name for logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ensemble { .. } => "ensemble",
            Self::Fallback => "fallback",
        }
    }
}

/// Result of classifying one piece of text
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Winning category code as reported by the label encoder
    pub category: String,

    /// Display names for the winning category
    pub display: CategoryInfo,

    /// Probability of the winning category (0.0-1.0)
    pub confidence: f32,

    /// Probability per category code
    pub all_probabilities: BTreeMap<String, f32>,

    /// Path that produced this result
    pub source: PredictionSource,
}

impl ClassificationResult {
    /// Create a result, resolving display names from the category table
    pub fn new(
        category: impl Into<String>,
        confidence: f32,
        all_probabilities: BTreeMap<String, f32>,
        source: PredictionSource,
    ) -> Self {
        let category = category.into();
        let display = CategoryInfo::for_code(&category);
        Self {
            category,
            display,
            confidence,
            all_probabilities,
            source,
        }
    }

    /// Largest entry in the probability distribution
    pub fn max_probability(&self) -> f32 {
        self.all_probabilities
            .values()
            .copied()
            .fold(0.0_f32, f32::max)
    }
}
