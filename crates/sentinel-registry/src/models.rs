//! Data types persisted by the registry: security policies, the history of
//! threats acted on, and ingested threat-intel indicators of compromise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action a policy rule dictates once it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyAction {
    Allow,
    Flag,
    Block,
}

/// A named rule: `rule` is an opaque JSON matcher (pattern set, entropy
/// threshold override, IOC list reference, ...) interpreted by the
/// component that owns the corresponding scan phase. The registry itself
/// only stores, hashes, and versions policies; it does not evaluate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub rule: serde_json::Value,
    pub action: PolicyAction,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rule: serde_json::Value, action: PolicyAction) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            rule,
            action,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Record of a past scan decision, kept for audit and for behavioral
/// analyzers that weigh recent history (repeated flags from the same
/// subject escalate faster than an isolated one).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatHistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub subject: String,
    pub threat_type: String,
    pub confidence: f64,
    pub action_taken: PolicyAction,
}

/// Kind of indicator of compromise, following the mapping the OTX feed
/// client used for pulse indicator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IocType {
    Domain,
    IpAddress,
    Url,
    FileHashSha256,
    FileHashMd5,
    Email,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ioc {
    pub id: String,
    pub ioc_type: IocType,
    pub value: String,
    pub source: String,
    pub confidence: f64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}
