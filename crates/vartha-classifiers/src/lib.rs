//! Vartha Classifiers
//!
//! Everything between raw text and a [`ClassificationResult`]:
//! - a pretrained TF-IDF vectorizer and label encoder loaded from JSON artifacts
//! - classifier artifacts (Candle linear heads, precomputed probability vectors,
//!   or in-process callables) behind a single `produce_probabilities` capability
//! - a read-only model registry populated once at startup
//! - ensemble averaging over the models that produced a usable vector
//! - a deterministic keyword fallback when none did
//!
//! [`ClassificationResult`]: vartha_core::ClassificationResult

pub mod config;
pub mod ensemble;
pub mod fallback;
pub mod label_encoder;
pub mod model;
pub mod model_loader;
pub mod pipeline;
pub mod registry;
pub mod vectorizer;

pub use config::{ArtifactConfig, ArtifactSourceSpec, ClassifierSpec, ModelKind};
pub use fallback::KeywordFallback;
pub use label_encoder::LabelEncoder;
pub use model::{LinearModel, ModelArtifact, PredictionOutcome, SkipReason};
pub use model_loader::ArtifactSource;
pub use pipeline::InferencePipeline;
pub use registry::{LoadStatus, ModelRegistry};
pub use vectorizer::{FeatureVector, Norm, TfidfVectorizer, TfidfVectorizerSpec, WordChars};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::label_encoder::LabelEncoder;
    pub use crate::model::{ModelArtifact, PredictionOutcome};
    pub use crate::pipeline::InferencePipeline;
    pub use crate::registry::{LoadStatus, ModelRegistry};
    pub use crate::vectorizer::{FeatureVector, TfidfVectorizer};
    pub use vartha_core::{ClassificationResult, Error, Result};
}
