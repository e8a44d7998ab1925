//! Error types for the Sentinel facade.
//!
//! Each sub-crate's own error type is wrapped with `#[from]`, the same
//! passthrough pattern the rest of the codebase uses at crate boundaries.
//! [`SentinelError::kind`] additionally classifies every variant into the
//! six-category taxonomy (`InputInvalid`/`SecurityRefused`/`TransientSystem`/
//! `PermanentSystem`/`DependencyFailure`/`Internal`) callers actually branch
//! on — e.g. to decide whether a failure should fail open or fail closed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("registry error: {0}")]
    Registry(#[from] sentinel_registry::RegistryError),

    #[error("vault error: {0}")]
    Vault(#[from] sentinel_vault::VaultError),

    #[error("council error: {0}")]
    Council(#[from] sentinel_council::CouncilError),

    #[error("monitor error: {0}")]
    Monitor(#[from] sentinel_monitor::MonitorError),

    #[error("isolator error: {0}")]
    Isolator(#[from] sentinel_isolator::IsolatorError),

    #[error("primitives error: {0}")]
    Primitives(#[from] sentinel_primitives::PrimitivesError),

    #[error("invalid input: {0}")]
    InputInvalid(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// The operational category a [`SentinelError`] falls into. This is what
/// the orchestration pipeline and the CLI actually act on: a
/// `DependencyFailure` during a scan may fail open per policy, while
/// `SecurityRefused` never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputInvalid,
    SecurityRefused,
    TransientSystem,
    PermanentSystem,
    DependencyFailure,
    Internal,
}

impl SentinelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SentinelError::InputInvalid(_) => ErrorKind::InputInvalid,
            SentinelError::Config(_) => ErrorKind::PermanentSystem,
            SentinelError::Internal(_) => ErrorKind::Internal,
            SentinelError::Council(e) => match e {
                sentinel_council::CouncilError::InvalidInput(_) => ErrorKind::InputInvalid,
                sentinel_council::CouncilError::AnalyzerFailure(..) => ErrorKind::DependencyFailure,
            },
            SentinelError::Monitor(e) => match e {
                sentinel_monitor::MonitorError::QueueFull(_) => ErrorKind::TransientSystem,
                sentinel_monitor::MonitorError::ShuttingDown => ErrorKind::TransientSystem,
                sentinel_monitor::MonitorError::Timeout(_) => ErrorKind::DependencyFailure,
            },
            SentinelError::Isolator(e) => match e {
                sentinel_isolator::IsolatorError::CriticalProcess(_) => ErrorKind::SecurityRefused,
                sentinel_isolator::IsolatorError::NoBackendAvailable => ErrorKind::DependencyFailure,
                sentinel_isolator::IsolatorError::NotIsolated(_) => ErrorKind::InputInvalid,
                sentinel_isolator::IsolatorError::BackendCommand(_) => ErrorKind::DependencyFailure,
                sentinel_isolator::IsolatorError::Io(_) => ErrorKind::TransientSystem,
            },
            SentinelError::Registry(_) => ErrorKind::PermanentSystem,
            SentinelError::Vault(_) => ErrorKind::PermanentSystem,
            SentinelError::Primitives(e) => match e {
                sentinel_primitives::PrimitivesError::CircuitOpen => ErrorKind::DependencyFailure,
                sentinel_primitives::PrimitivesError::RetriesExhausted { .. } => ErrorKind::DependencyFailure,
                sentinel_primitives::PrimitivesError::Io(_) => ErrorKind::TransientSystem,
                sentinel_primitives::PrimitivesError::Serialize(_) => ErrorKind::PermanentSystem,
                sentinel_primitives::PrimitivesError::UnknownHealthCheck(_) => ErrorKind::InputInvalid,
            },
        }
    }
}
