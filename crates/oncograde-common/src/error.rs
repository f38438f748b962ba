use thiserror::Error;

#[derive(Debug, Error)]
pub enum OncogradeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid variant context: {0}")]
    InvalidContext(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, OncogradeError>;
