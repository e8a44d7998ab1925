//! # Sentinel Core
//!
//! Unified security facade. Orchestrates the content scanner, behavioral
//! analyzers, traffic monitor, credential-flow monitor, policy store, and
//! quarantine vault behind a single scan -> behavior -> traffic -> decision
//! pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Sentinel (facade)                  │
//! ├─────────────────────────────────────────────────────────┤
//! │   ContentScanner   TrafficMonitor   FormMonitor          │
//! │     (scan)           (behavior)      (credential flow)   │
//! │        │                 │                 │             │
//! │        └────────┬────────┴────────┬────────┘             │
//! │                 ▼                 ▼                      │
//! │           PolicyStore        QuarantineVault              │
//! │        (decisions/IOCs)      (on Block)                   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Any phase can veto (short-circuit to Block); each decision is recorded
//! to the policy store's threat history regardless of outcome.

mod config;
mod error;
mod sentinel;
mod verdict;

pub use config::SentinelConfig;
pub use error::{ErrorKind, SentinelError};
pub use sentinel::{Sentinel, SentinelHandle};
pub use verdict::{BlockReason, ReviewFlag, Verdict};

pub use sentinel_council::{CredentialFlow, FlowClassification};
pub use sentinel_registry::{Ioc, IocType, Policy, PolicyAction};

/// Core result type for sentinel operations.
pub type Result<T> = std::result::Result<T, SentinelError>;
