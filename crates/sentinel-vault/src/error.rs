use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("quarantine id '{0}' does not match the expected grammar")]
    InvalidId(String),

    #[error("quarantine entry '{0}' not found")]
    NotFound(String),

    #[error("restore destination '{0}' is outside the allowed directory")]
    UnsafeDestination(String),

    #[error("restore destination '{0}' already exists")]
    DestinationExists(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;
