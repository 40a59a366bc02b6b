use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleaningError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DataFrame operation failed: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid artifact reference: '{0}'")]
    BadArtifactRef(String),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

pub type Result<T> = std::result::Result<T, CleaningError>;
