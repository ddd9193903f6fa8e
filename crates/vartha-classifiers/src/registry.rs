//! Model registry initialization and management

use crate::config::{ArtifactConfig, ClassifierSpec};
use crate::label_encoder::LabelEncoder;
use crate::model::{first_invalid_probability, ModelArtifact};
use crate::model_loader::load_classifier;
use crate::vectorizer::TfidfVectorizer;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};
use vartha_core::Result;

/// Outcome of [`ModelRegistry::load`], transitioned once at startup.
///
/// Only `load` assigns it. Registries assembled with the `with_*` builders
/// stay `Unloaded`; use [`ModelRegistry::is_ready`] for readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Unloaded,
    Loading,
    /// Every configured artifact loaded
    Ready,
    /// At least one configured artifact is missing
    PartiallyReady,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::PartiallyReady => "partially_ready",
        };
        f.write_str(s)
    }
}

/// Read-only set of artifacts used by the inference pipeline
pub struct ModelRegistry {
    vectorizer: Option<TfidfVectorizer>,
    label_encoder: Option<LabelEncoder>,
    /// Classifiers in ensemble order
    classifiers: Vec<(String, ModelArtifact)>,
    status: LoadStatus,
}

impl ModelRegistry {
    /// Create an empty, unloaded registry
    pub fn new() -> Self {
        Self {
            vectorizer: None,
            label_encoder: None,
            classifiers: Vec::new(),
            status: LoadStatus::Unloaded,
        }
    }

    /// Load every artifact named by `config`.
    ///
    /// Never fails: artifacts that cannot be loaded are logged and left out,
    /// and the remaining ones are still loaded.
    pub fn load(config: &ArtifactConfig) -> Self {
        let mut registry = Self::new();
        registry.status = LoadStatus::Loading;

        info!(
            "Loading {} artifacts from {}",
            config.artifact_count(),
            config.models_dir.display()
        );

        let mut failures = 0usize;

        let source = config.vectorizer_source();
        match source.resolve().and_then(TfidfVectorizer::from_file) {
            Ok(vectorizer) => {
                info!(
                    "✓ Loaded vectorizer from {} ({} terms, {} features)",
                    source,
                    vectorizer.vocabulary_size(),
                    vectorizer.dim()
                );
                registry.vectorizer = Some(vectorizer);
            }
            Err(e) => {
                warn!("✗ Failed to load vectorizer from {}: {}", source, e);
                failures += 1;
            }
        }

        let source = config.label_encoder_source();
        match source.resolve().and_then(LabelEncoder::from_file) {
            Ok(encoder) => {
                info!("✓ Loaded label encoder with classes {:?}", encoder.classes());
                if !encoder.matches_categories() {
                    warn!(
                        "Label encoder classes {:?} differ from the category table",
                        encoder.classes()
                    );
                }
                registry.label_encoder = Some(encoder);
            }
            Err(e) => {
                warn!("✗ Failed to load label encoder from {}: {}", source, e);
                failures += 1;
            }
        }

        for spec in &config.classifiers {
            match Self::load_one(spec, config) {
                Ok(artifact) => {
                    info!("✓ Loaded model: {} ({})", spec.name, artifact.kind());
                    registry.register(spec.name.clone(), artifact);
                }
                Err(e) => {
                    // Keep going; the remaining artifacts may still load
                    warn!("✗ Failed to load model {}: {}", spec.name, e);
                    failures += 1;
                }
            }
        }

        registry.status = if failures == 0 {
            LoadStatus::Ready
        } else {
            LoadStatus::PartiallyReady
        };

        info!(
            "Model registry {} with {}/{} artifacts",
            registry.status,
            config.artifact_count() - failures,
            config.artifact_count()
        );

        registry
    }

    fn load_one(spec: &ClassifierSpec, config: &ArtifactConfig) -> Result<ModelArtifact> {
        load_classifier(spec.kind, &spec.source.to_source(&config.models_dir))
    }

    /// Set the vectorizer
    pub fn with_vectorizer(mut self, vectorizer: TfidfVectorizer) -> Self {
        self.vectorizer = Some(vectorizer);
        self
    }

    /// Set the label encoder
    pub fn with_label_encoder(mut self, encoder: LabelEncoder) -> Self {
        self.label_encoder = Some(encoder);
        self
    }

    /// Append a classifier to the ensemble
    pub fn with_classifier(mut self, name: impl Into<String>, artifact: ModelArtifact) -> Self {
        self.register(name, artifact);
        self
    }

    fn register(&mut self, name: impl Into<String>, artifact: ModelArtifact) {
        let name = name.into();
        if let (Some(width), Some(encoder)) = (artifact.output_width(), &self.label_encoder) {
            if width != encoder.len() {
                warn!(
                    "Model {} produces {} probabilities but the label encoder has {} classes",
                    name,
                    width,
                    encoder.len()
                );
            }
        }
        if let ModelArtifact::Precomputed(probabilities) = &artifact {
            if let Some((index, value)) = first_invalid_probability(probabilities) {
                warn!(
                    "Model {} has probability {} at index {}; it will be skipped",
                    name, value, index
                );
            }
        }
        self.classifiers.push((name, artifact));
    }

    /// Whether the vectorizer and label encoder are both present
    pub fn is_ready(&self) -> bool {
        self.vectorizer.is_some() && self.label_encoder.is_some()
    }

    /// Current load state
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Loaded vectorizer, if any
    pub fn vectorizer(&self) -> Option<&TfidfVectorizer> {
        self.vectorizer.as_ref()
    }

    /// Loaded label encoder, if any
    pub fn label_encoder(&self) -> Option<&LabelEncoder> {
        self.label_encoder.as_ref()
    }

    /// Classifiers in ensemble order
    pub fn classifiers(&self) -> impl Iterator<Item = (&str, &ModelArtifact)> {
        self.classifiers.iter().map(|(name, a)| (name.as_str(), a))
    }

    /// Check if a classifier is registered
    pub fn has_model(&self, name: &str) -> bool {
        self.classifiers.iter().any(|(n, _)| n == name)
    }

    /// Names of registered classifiers
    pub fn model_names(&self) -> Vec<String> {
        self.classifiers.iter().map(|(n, _)| n.clone()).collect()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
