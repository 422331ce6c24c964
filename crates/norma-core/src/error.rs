use thiserror::Error;

/// Top-level error type for the Norma system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for NormaError`
/// where needed so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NormaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Document not found: {collection}/{id}")]
    DocumentNotFound { collection: String, id: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for NormaError {
    fn from(err: toml::de::Error) -> Self {
        NormaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for NormaError {
    fn from(err: toml::ser::Error) -> Self {
        NormaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for NormaError {
    fn from(err: serde_json::Error) -> Self {
        NormaError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NormaError>;
