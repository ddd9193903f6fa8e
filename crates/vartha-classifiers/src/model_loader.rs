//! Artifact resolution and loading

use crate::config::ModelKind;
use crate::model::{first_invalid_probability, LinearModel, ModelArtifact};
use hf_hub::{api::sync::Api, Repo, RepoType};
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use vartha_core::{Error, Result};

/// Source location for an artifact file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Load from local file system
    LocalPath(PathBuf),

    /// Download from Hugging Face Hub
    HuggingFace {
        repo_id: String,
        revision: Option<String>,
        filename: String,
    },
}

impl ArtifactSource {
    /// Resolve the source to a readable local path, downloading if needed
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            Self::LocalPath(path) => {
                if !path.exists() {
                    return Err(Error::artifact(format!(
                        "Artifact file not found: {}",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
            Self::HuggingFace {
                repo_id,
                revision,
                filename,
            } => {
                let api = Api::new()
                    .map_err(|e| Error::artifact(format!("Failed to initialize HF API: {}", e)))?;

                let repo = api.repo(Repo::with_revision(
                    repo_id.clone(),
                    RepoType::Model,
                    revision.clone().unwrap_or_else(|| "main".to_string()),
                ));

                repo.get(filename).map_err(|e| {
                    Error::artifact(format!(
                        "Failed to download {} from {}: {}",
                        filename, repo_id, e
                    ))
                })
            }
        }
    }
}

impl fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalPath(path) => write!(f, "{}", path.display()),
            Self::HuggingFace {
                repo_id,
                revision,
                filename,
            } => write!(
                f,
                "hf://{}@{}/{}",
                repo_id,
                revision.as_deref().unwrap_or("main"),
                filename
            ),
        }
    }
}

/// Deserialize a JSON artifact
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| {
        Error::artifact(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

/// Load a classifier artifact of the given kind and adapt it to [`ModelArtifact`]
pub fn load_classifier(kind: ModelKind, source: &ArtifactSource) -> Result<ModelArtifact> {
    let path = source.resolve()?;

    match kind {
        ModelKind::Linear => Ok(ModelArtifact::Linear(LinearModel::from_safetensors(&path)?)),
        ModelKind::Probabilities => {
            let probabilities: Vec<f32> = load_json(&path)?;
            if let Some((index, value)) = first_invalid_probability(&probabilities) {
                return Err(Error::artifact(format!(
                    "{}: probability {} at index {} is not in [0, 1]",
                    path.display(),
                    value,
                    index
                )));
            }
            Ok(ModelArtifact::Precomputed(probabilities))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_local_artifact() {
        let source = ArtifactSource::LocalPath(PathBuf::from("/nonexistent/vectorizer.json"));
        let err = source.resolve().unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_display() {
        let source = ArtifactSource::HuggingFace {
            repo_id: "vartha/telugu-news".to_string(),
            revision: None,
            filename: "label_encoder.json".to_string(),
        };
        assert_eq!(
            source.to_string(),
            "hf://vartha/telugu-news@main/label_encoder.json"
        );
    }

    #[test]
    fn test_load_precomputed_probabilities() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bilstm_model.json");
        std::fs::write(&path, "[0.1, 0.2, 0.3, 0.2, 0.2]").unwrap();

        let artifact =
            load_classifier(ModelKind::Probabilities, &ArtifactSource::LocalPath(path)).unwrap();
        assert_eq!(artifact.output_width(), Some(5));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = load_classifier(ModelKind::Probabilities, &ArtifactSource::LocalPath(path));
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
