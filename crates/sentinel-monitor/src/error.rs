use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("scan queue is at capacity ({0} pending)")]
    QueueFull(usize),

    #[error("scan queue is shutting down")]
    ShuttingDown,

    #[error("scan timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
