//! Inference pipeline: vectorize → per-model prediction → ensemble → label
//!
//! The pipeline owns no mutable state. It borrows the registry through an
//! `Arc`, so a single instance can serve concurrent requests.

use crate::ensemble;
use crate::fallback::KeywordFallback;
use crate::model::PredictionOutcome;
use crate::registry::ModelRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use vartha_core::{ClassificationResult, Error, PredictionSource, Result};

/// Classifies text against a loaded [`ModelRegistry`]
#[derive(Clone)]
pub struct InferencePipeline {
    registry: Arc<ModelRegistry>,
    fallback: Arc<KeywordFallback>,
}

impl InferencePipeline {
    /// Create a pipeline over a registry
    pub fn new(registry: Arc<ModelRegistry>) -> Result<Self> {
        Ok(Self {
            registry,
            fallback: Arc::new(KeywordFallback::new()?),
        })
    }

    /// Get reference to the registry
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Whether `classify` can run
    pub fn is_ready(&self) -> bool {
        self.registry.is_ready()
    }

    /// Classify one document.
    ///
    /// Fails with [`Error::NotReady`] when the vectorizer or label encoder is
    /// missing, and with [`Error::InvalidInput`] when the trimmed text is
    /// empty. Readiness is checked first.
    pub fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let (vectorizer, encoder) =
            match (self.registry.vectorizer(), self.registry.label_encoder()) {
                (Some(v), Some(e)) => (v, e),
                _ => return Err(Error::NotReady),
            };

        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_input("Text cannot be empty"));
        }

        let features = vectorizer.transform(text);
        debug!(
            "Vectorized {} chars into {} non-zero features",
            text.chars().count(),
            features.nnz()
        );

        let num_classes = encoder.len();
        let mut vectors = Vec::new();
        let mut contributors = Vec::new();

        for (name, artifact) in self.registry.classifiers() {
            match PredictionOutcome::attempt(name, artifact, &features, num_classes) {
                PredictionOutcome::Probabilities(probabilities) => {
                    vectors.push(probabilities);
                    contributors.push(name.to_string());
                }
                PredictionOutcome::Skipped { model, reason } => {
                    warn!("Skipping model {}: {}", model, reason);
                    metrics::counter!("vartha_model_skips_total", "model" => model).increment(1);
                }
            }
        }

        let Some(mean) = ensemble::average(&vectors) else {
            debug!("No usable model output, using keyword fallback");
            return Ok(self.fallback.classify(text));
        };

        let winner = ensemble::argmax(&mean)
            .ok_or_else(|| Error::internal("ensemble produced no finite probabilities"))?;
        let category = encoder
            .inverse_transform(winner)
            .ok_or_else(|| Error::internal(format!("no class for index {}", winner)))?;
        let confidence = mean[winner];

        let all_probabilities: BTreeMap<String, f32> = encoder
            .classes()
            .iter()
            .cloned()
            .zip(mean.iter().copied())
            .collect();

        debug!(
            "Ensemble of {:?} chose {} ({:.3})",
            contributors, category, confidence
        );

        Ok(ClassificationResult::new(
            category,
            confidence,
            all_probabilities,
            PredictionSource::Ensemble {
                models: contributors,
            },
        ))
    }
}
