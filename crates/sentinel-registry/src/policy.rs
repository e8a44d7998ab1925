//! Policy store facade: the component other crates talk to when they need
//! to look up or record rules, and when they need to persist a scan
//! decision into threat history.

use std::path::Path;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Ioc, Policy, PolicyAction, ThreatHistoryEntry};
use crate::storage::Storage;

pub struct PolicyStore {
    storage: Storage,
}

impl PolicyStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self { storage: Storage::open(path)? })
    }

    pub fn temporary() -> Result<Self> {
        Ok(Self { storage: Storage::temporary()? })
    }

    pub fn create_policy(&self, name: impl Into<String>, rule: serde_json::Value, action: PolicyAction) -> Result<Policy> {
        let policy = Policy::new(Uuid::new_v4().to_string(), name, rule, action);
        self.storage.store_policy(&policy)?;
        Ok(policy)
    }

    pub fn update_policy(&self, mut policy: Policy) -> Result<Policy> {
        policy.updated_at = chrono::Utc::now();
        self.storage.store_policy(&policy)?;
        Ok(policy)
    }

    pub fn get_policy(&self, id: &str) -> Result<Option<Policy>> {
        self.storage.load_policy(id)
    }

    pub fn list_policies(&self) -> Result<Vec<Policy>> {
        self.storage.list_policies()
    }

    pub fn enabled_policies(&self) -> Result<Vec<Policy>> {
        Ok(self.storage.list_policies()?.into_iter().filter(|p| p.enabled).collect())
    }

    pub fn remove_policy(&self, id: &str) -> Result<bool> {
        self.storage.remove_policy(id)
    }

    pub fn record_decision(&self, subject: impl Into<String>, threat_type: impl Into<String>, confidence: f64, action_taken: PolicyAction) -> Result<ThreatHistoryEntry> {
        let entry = ThreatHistoryEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now(),
            subject: subject.into(),
            threat_type: threat_type.into(),
            confidence,
            action_taken,
        };
        self.storage.record_threat_history(&entry)?;
        Ok(entry)
    }

    /// Recent decisions for `subject`, most recent first. Used by the
    /// behavioral analyzers to escalate confidence for repeat offenders.
    pub fn history_for(&self, subject: &str, limit: usize) -> Result<Vec<ThreatHistoryEntry>> {
        self.storage.recent_history_for_subject(subject, limit)
    }

    pub fn store_ioc(&self, ioc: &Ioc) -> Result<()> {
        self.storage.store_ioc(ioc)
    }

    pub fn find_ioc(&self, value: &str) -> Result<Option<Ioc>> {
        self.storage.find_ioc_by_value(value)
    }

    pub fn list_iocs(&self) -> Result<Vec<Ioc>> {
        self.storage.list_iocs()
    }

    pub fn flush(&self) -> Result<()> {
        self.storage.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_fetch_policy() {
        let store = PolicyStore::temporary().unwrap();
        let created = store
            .create_policy("block tor exit nodes", serde_json::json!({"list": "tor_exit"}), PolicyAction::Block)
            .unwrap();
        let fetched = store.get_policy(&created.id).unwrap().unwrap();
        assert_eq!(fetched.name, "block tor exit nodes");
    }

    #[test]
    fn disabled_policies_excluded_from_enabled_list() {
        let store = PolicyStore::temporary().unwrap();
        let mut policy = store
            .create_policy("flag suspicious", serde_json::json!({}), PolicyAction::Flag)
            .unwrap();
        policy.enabled = false;
        store.update_policy(policy).unwrap();
        assert!(store.enabled_policies().unwrap().is_empty());
        assert_eq!(store.list_policies().unwrap().len(), 1);
    }

    #[test]
    fn decision_history_tracks_subject() {
        let store = PolicyStore::temporary().unwrap();
        store
            .record_decision("agent-42", "dga", 0.91, PolicyAction::Block)
            .unwrap();
        let history = store.history_for("agent-42", 10).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].threat_type, "dga");
    }
}
