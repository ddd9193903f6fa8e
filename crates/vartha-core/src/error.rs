//! Error types for Vartha

/// Result type alias using Vartha's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Vartha operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Artifact resolution or deserialization errors
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Model inference errors
    #[error("model error: {0}")]
    Model(String),

    /// Text vectorization errors
    #[error("vectorizer error: {0}")]
    Vectorizer(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Request input rejected before inference
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Vectorizer or label encoder missing from the registry
    #[error("models not loaded")]
    NotReady,

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new vectorizer error
    pub fn vectorizer(msg: impl Into<String>) -> Self {
        Self::Vectorizer(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short, stable name of the error kind (used as a metrics label)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Artifact(_) => "artifact",
            Self::Model(_) => "model",
            Self::Vectorizer(_) => "vectorizer",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::NotReady => "not_ready",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}
