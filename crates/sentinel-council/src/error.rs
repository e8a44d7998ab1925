use thiserror::Error;

#[derive(Debug, Error)]
pub enum CouncilError {
    #[error("analyzer '{0}' failed: {1}")]
    AnalyzerFailure(String, String),

    #[error("invalid input for analysis: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CouncilError>;
