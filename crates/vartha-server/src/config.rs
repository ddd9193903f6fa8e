//! Service configuration

use crate::cli::Cli;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vartha_classifiers::ArtifactConfig;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed to call the API
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Model artifact locations
    #[serde(default)]
    pub artifacts: ArtifactConfig,
}

impl ServiceConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(&cli.config).exists() {
            let content = std::fs::read_to_string(&cli.config)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        if let Some(models_dir) = &cli.models_dir {
            config.artifacts.models_dir = models_dir.clone();
        }

        Ok(config)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            artifacts: ArtifactConfig::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_file_uses_defaults() {
        let cli = Cli {
            config: PathBuf::from("/nonexistent/vartha.yaml"),
            ..Default::default()
        };
        let config = ServiceConfig::load(&cli).unwrap();

        assert_eq!(config.listen, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.artifacts.models_dir, PathBuf::from("models"));
    }

    #[test]
    fn test_file_then_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
port: 8100
cors_origins:
  - https://news.example.org
artifacts:
  models_dir: /srv/vartha
"#,
        )
        .unwrap();

        let cli = Cli {
            config: path,
            port: Some(9000),
            models_dir: Some(PathBuf::from("/tmp/models")),
            ..Default::default()
        };
        let config = ServiceConfig::load(&cli).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.listen, "0.0.0.0");
        assert_eq!(config.cors_origins, vec!["https://news.example.org"]);
        assert_eq!(config.artifacts.models_dir, PathBuf::from("/tmp/models"));
        assert_eq!(config.artifacts.classifiers.len(), 3);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "port: [not, a, port]").unwrap();

        let cli = Cli {
            config: path,
            ..Default::default()
        };
        assert!(ServiceConfig::load(&cli).is_err());
    }
}
