use thiserror::Error;

#[derive(Debug, Error)]
pub enum IsolatorError {
    #[error("no supported firewall backend found (tried nftables and iptables)")]
    NoBackendAvailable,

    #[error("refusing to isolate critical system process (pid {0})")]
    CriticalProcess(i32),

    #[error("process {0} is not currently isolated")]
    NotIsolated(i32),

    #[error("firewall command failed: {0}")]
    BackendCommand(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IsolatorError>;
