//! Configuration for the artifact store

use crate::model_loader::ArtifactSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vartha_core::{Error, Result};

/// Where each startup artifact lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Base directory for local artifact paths
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// TF-IDF vectorizer artifact
    #[serde(default = "default_vectorizer")]
    pub vectorizer: ArtifactSourceSpec,

    /// Label encoder artifact
    #[serde(default = "default_label_encoder")]
    pub label_encoder: ArtifactSourceSpec,

    /// Classifier artifacts, in ensemble order
    #[serde(default = "default_classifiers")]
    pub classifiers: Vec<ClassifierSpec>,
}

/// One classifier in the ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSpec {
    /// Model name used in logs and metrics
    pub name: String,

    /// How the artifact file is interpreted
    pub kind: ModelKind,

    /// Artifact location
    #[serde(flatten)]
    pub source: ArtifactSourceSpec,
}

/// On-disk classifier artifact kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// SafeTensors `weight`/`bias` of a multinomial logistic regression
    Linear,
    /// JSON array used as the probability vector for every input
    Probabilities,
}

/// Artifact source specification (for config files)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactSourceSpec {
    /// Hugging Face Hub
    HuggingFace {
        repo_id: String,
        filename: String,
        revision: Option<String>,
    },

    /// File path, relative to `models_dir` unless absolute
    Local { path: PathBuf },
}

impl ArtifactSourceSpec {
    /// Local source helper
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    /// Convert to a loader source, anchoring relative paths at `models_dir`
    pub fn to_source(&self, models_dir: &Path) -> ArtifactSource {
        match self {
            Self::Local { path } => ArtifactSource::LocalPath(models_dir.join(path)),
            Self::HuggingFace {
                repo_id,
                filename,
                revision,
            } => ArtifactSource::HuggingFace {
                repo_id: repo_id.clone(),
                revision: revision.clone(),
                filename: filename.clone(),
            },
        }
    }
}

impl ArtifactConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse artifact config: {}", e)))
    }

    /// Default layout rooted at another directory
    pub fn with_models_dir(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            ..Self::default()
        }
    }

    /// Resolved vectorizer source
    pub fn vectorizer_source(&self) -> ArtifactSource {
        self.vectorizer.to_source(&self.models_dir)
    }

    /// Resolved label encoder source
    pub fn label_encoder_source(&self) -> ArtifactSource {
        self.label_encoder.to_source(&self.models_dir)
    }

    /// Number of artifacts a complete load produces
    pub fn artifact_count(&self) -> usize {
        2 + self.classifiers.len()
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            vectorizer: default_vectorizer(),
            label_encoder: default_label_encoder(),
            classifiers: default_classifiers(),
        }
    }
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_vectorizer() -> ArtifactSourceSpec {
    ArtifactSourceSpec::local("tfidf_vectorizer.json")
}

fn default_label_encoder() -> ArtifactSourceSpec {
    ArtifactSourceSpec::local("label_encoder.json")
}

fn default_classifiers() -> Vec<ClassifierSpec> {
    vec![
        ClassifierSpec {
            name: "muril".to_string(),
            kind: ModelKind::Linear,
            source: ArtifactSourceSpec::local("muril_model.safetensors"),
        },
        ClassifierSpec {
            name: "bilstm".to_string(),
            kind: ModelKind::Probabilities,
            source: ArtifactSourceSpec::local("bilstm_model.json"),
        },
        ClassifierSpec {
            name: "lgb".to_string(),
            kind: ModelKind::Linear,
            source: ArtifactSourceSpec::local("lgb_model.safetensors"),
        },
    ]
}
