//! # Policy Store and Threat Intelligence
//!
//! Persists the rules the rest of the system enforces (policies), the
//! history of decisions made (threat history, used by behavioral analyzers
//! that weigh repeat offenders more heavily), and indicators of compromise
//! ingested from external threat-intel feeds.
//!
//! Backed by SQLite (via `rusqlite`, bundled) rather than an embedded
//! key-value store: the policy/history/IOC tables benefit from relational
//! queries (recent history for a subject, IOCs by type) that a pure KV
//! store would need to hand-roll as secondary indexes anyway.
//!
//! ## Layout
//!
//! - [`schema`] — forward-only migrations, refuses to open a newer schema
//!   than this build understands.
//! - [`storage`] — raw SQLite access, one `store_*`/`load_*`/`list_*`
//!   family per record kind.
//! - [`policy`] — [`PolicyStore`], the facade other crates use.
//! - [`intel`] — pulse ingestion and YARA rule synthesis for IOCs.

pub mod error;
pub mod intel;
pub mod models;
pub mod policy;
pub mod schema;
pub mod storage;

pub use error::{Hash, RegistryError, Result, HASH_SIZE};
pub use intel::{ingest_pulse, synthesize_yara_rule, Pulse, RawIndicator};
pub use models::{Ioc, IocType, Policy, PolicyAction, ThreatHistoryEntry};
pub use policy::PolicyStore;
