use thiserror::Error;

/// Errors shared by the low-level primitives used throughout the workspace.
#[derive(Debug, Error)]
pub enum PrimitivesError {
    #[error("circuit breaker is open, rejecting call")]
    CircuitOpen,

    #[error("retry budget exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("audit log io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit log serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("health check '{0}' not registered")]
    UnknownHealthCheck(String),
}

pub type Result<T> = std::result::Result<T, PrimitivesError>;
