//! The unified Sentinel facade.
//!
//! Orchestrates the content scanner, behavioral/traffic analyzers, and
//! credential-flow monitor into a single scan -> behavior -> traffic ->
//! decision pipeline, short-circuiting on the first phase that blocks.
//! Grounded on the 3-phase short-circuiting structure of the facade this
//! crate's pipeline was generalized from.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use sentinel_council::{CredentialFlow, FlowClassification, FormMonitor, TrafficMonitor};
use sentinel_firewall::{ContentScanner, DependencyFailurePolicy, IocLookup, ScanResult};
use sentinel_registry::{Ioc, IocType, PolicyAction, PolicyStore};
use sentinel_vault::QuarantineVault;

use crate::config::{DependencyFailureSetting, SentinelConfig};
use crate::error::SentinelError;
use crate::verdict::{BlockReason, ReviewFlag, Verdict};
use crate::Result;

/// Adapts the policy store's IOC table to the firewall's lookup interface,
/// so the scanner never needs to know the registry crate exists.
struct RegistryIocLookup<'a>(&'a PolicyStore);

impl IocLookup for RegistryIocLookup<'_> {
    fn is_known_bad_hash(&self, sha256_hex: &str) -> std::result::Result<bool, String> {
        self.0.find_ioc(sha256_hex).map(|found| found.is_some()).map_err(|e| e.to_string())
    }
}

pub struct Sentinel {
    config: SentinelConfig,
    policy_store: PolicyStore,
    vault: QuarantineVault,
    scanner: ContentScanner,
    traffic: TrafficMonitor,
    forms: FormMonitor,
}

impl Sentinel {
    pub async fn new(config: SentinelConfig) -> Result<Self> {
        let policy_store = PolicyStore::open(&config.registry.db_path)?;
        let vault = QuarantineVault::open(&config.vault.quarantine_dir).await?;

        let dependency_failure_policy = match config.firewall.dependency_failure_policy {
            DependencyFailureSetting::FailOpen => DependencyFailurePolicy::FailOpen,
            DependencyFailureSetting::FailClosed => DependencyFailurePolicy::FailClosed,
        };
        config
            .firewall
            .size_tiers
            .validate()
            .map_err(|e| SentinelError::Internal(format!("invalid firewall.size_tiers config: {e}")))?;
        let scanner = ContentScanner::new()
            .with_dependency_failure_policy(dependency_failure_policy)
            .with_config(config.firewall.size_tiers);

        info!("sentinel facade initialized");

        Ok(Self {
            config,
            policy_store,
            vault,
            scanner,
            traffic: TrafficMonitor::new(),
            forms: FormMonitor::new(),
        })
    }

    /// Phase 1: scans raw content (a file, an attachment, a response body)
    /// for known-bad hashes, signature matches, and entropy/pattern
    /// anomalies. Records the decision in threat history.
    pub fn analyze_content(&self, subject: &str, data: &[u8]) -> Result<Verdict> {
        debug!(subject, "scanning content");
        let lookup = RegistryIocLookup(&self.policy_store);
        let result = self.scanner.scan_bytes(data, &lookup);

        let verdict = match result {
            ScanResult::Safe => Verdict::allow(),
            ScanResult::Blocked { threat, confidence, detail } => Verdict::block(BlockReason::ContentThreat {
                threat: format!("{threat:?}"),
                confidence,
                detail,
            }),
            ScanResult::Flagged { threat, confidence, detail } => {
                debug!(detail, "content flagged");
                Verdict::review(vec![ReviewFlag::ContentFlagged { threat: format!("{threat:?}"), confidence }])
            }
        };

        self.record_decision(subject, "content_scan", &verdict)?;
        Ok(verdict)
    }

    /// Phase 2/3: scans a network flow for DGA/C2/phishing anomalies.
    pub fn analyze_flow(&self, domain: &str, url: Option<&str>, interval_seconds: &[f64], payload_sizes: &[f64]) -> Result<Verdict> {
        let verdict = match self.traffic.analyze_flow(domain, url, interval_seconds, payload_sizes) {
            Some(alert) if alert.composite_score >= 0.8 => Verdict::block(BlockReason::BehaviorAnomaly {
                analyzer: "traffic_monitor".to_string(),
                confidence: alert.composite_score,
                detail: format!("{} signal(s) fired for {}", alert.signals.len(), alert.subject),
            }),
            Some(alert) => Verdict::review(vec![ReviewFlag::BehaviorFlagged {
                analyzer: "traffic_monitor".to_string(),
                confidence: alert.composite_score,
                detail: format!("{} signal(s) fired for {}", alert.signals.len(), alert.subject),
            }]),
            None => Verdict::allow(),
        };

        self.record_decision(domain, "traffic_flow", &verdict)?;
        Ok(verdict)
    }

    /// Phase: classifies a credential-bearing form submission.
    pub fn analyze_credential_flow(&self, flow: &CredentialFlow) -> Result<Verdict> {
        let verdict = match self.forms.classify(flow) {
            FlowClassification::Trusted => Verdict::allow(),
            FlowClassification::Unverified => Verdict::review(vec![ReviewFlag::UnverifiedCredentialFlow {
                form_origin: flow.form_origin.clone(),
                submit_target: flow.submit_target.clone(),
            }]),
            FlowClassification::Blocked => Verdict::block(BlockReason::CredentialLeak {
                form_origin: flow.form_origin.clone(),
                submit_target: flow.submit_target.clone(),
            }),
        };
        self.record_decision(&flow.form_origin, "credential_flow", &verdict)?;
        Ok(verdict)
    }

    /// Runs content scanning and, if blocked and the content is a file on
    /// disk, quarantines it. This is the decision surface: the point where
    /// a verdict turns into an action.
    pub async fn analyze_file(&self, path: &Path) -> Result<Verdict> {
        let data = tokio::fs::read(path).await.map_err(|e| SentinelError::Internal(e.to_string()))?;
        let subject = path.to_string_lossy().to_string();
        let verdict = self.analyze_content(&subject, &data)?;

        if verdict.is_blocked() {
            let reason = match &verdict {
                Verdict::Block { reason } => reason.to_string(),
                _ => unreachable!(),
            };
            match self.vault.quarantine_file(path, subject.clone(), vec![reason]).await {
                Ok(id) => warn!(subject, quarantine_id = id, "file quarantined"),
                Err(e) => warn!(subject, error = %e, "failed to quarantine blocked file"),
            }
        }

        Ok(verdict)
    }

    /// "Remember my decision": turns a one-off verdict into a persisted
    /// policy so the same subject is handled automatically next time.
    pub fn remember_decision(&self, name: impl Into<String>, rule: serde_json::Value, action: PolicyAction) -> Result<()> {
        self.policy_store.create_policy(name, rule, action)?;
        Ok(())
    }

    pub fn ingest_indicator(&self, ioc: &Ioc) -> Result<()> {
        self.policy_store.store_ioc(ioc)?;
        Ok(())
    }

    pub fn is_known_bad(&self, ioc_type: IocType, value: &str) -> Result<bool> {
        Ok(self
            .policy_store
            .find_ioc(value)?
            .map(|ioc| ioc.ioc_type == ioc_type)
            .unwrap_or(false))
    }

    fn record_decision(&self, subject: &str, threat_type: &str, verdict: &Verdict) -> Result<()> {
        if !self.config.global.audit_logging {
            return Ok(());
        }
        let (action, confidence) = match verdict {
            Verdict::Allow => (PolicyAction::Allow, 0.0),
            Verdict::Block { .. } => (PolicyAction::Block, 1.0),
            Verdict::Review { flags } => (
                PolicyAction::Flag,
                flags
                    .iter()
                    .map(|f| match f {
                        ReviewFlag::ContentFlagged { confidence, .. } => *confidence,
                        ReviewFlag::BehaviorFlagged { confidence, .. } => *confidence,
                        ReviewFlag::UnverifiedCredentialFlow { .. } => 0.5,
                    })
                    .fold(0.0, f64::max),
            ),
        };
        self.policy_store.record_decision(subject, threat_type, confidence, action)?;
        Ok(())
    }

    pub fn config(&self) -> &SentinelConfig {
        &self.config
    }

    pub fn policy_store(&self) -> &PolicyStore {
        &self.policy_store
    }

    pub fn vault(&self) -> &QuarantineVault {
        &self.vault
    }
}

pub type SentinelHandle = Arc<Sentinel>;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_sentinel(dir: &TempDir) -> Sentinel {
        let mut config = SentinelConfig::default();
        config.registry.db_path = dir.path().join("registry.db");
        config.vault.quarantine_dir = dir.path().join("quarantine");
        Sentinel::new(config).await.unwrap()
    }

    #[tokio::test]
    async fn safe_content_is_allowed() {
        let dir = TempDir::new().unwrap();
        let sentinel = test_sentinel(&dir).await;
        let verdict = sentinel.analyze_content("doc-1", b"hello world").unwrap();
        assert!(verdict.is_allowed());
    }

    #[tokio::test]
    async fn known_bad_hash_blocks_content() {
        let dir = TempDir::new().unwrap();
        let sentinel = test_sentinel(&dir).await;
        let data = b"malicious payload";
        let hash = sentinel_firewall::ContentScanner::sha256_hex(data);

        sentinel
            .ingest_indicator(&Ioc {
                id: "test-ioc".to_string(),
                ioc_type: IocType::FileHashSha256,
                value: hash,
                source: "test".to_string(),
                confidence: 1.0,
                first_seen: chrono::Utc::now(),
                last_seen: chrono::Utc::now(),
            })
            .unwrap();

        let verdict = sentinel.analyze_content("doc-2", data).unwrap();
        assert!(verdict.is_blocked());
    }

    #[tokio::test]
    async fn blocked_flow_is_recorded_in_history() {
        let dir = TempDir::new().unwrap();
        let sentinel = test_sentinel(&dir).await;
        sentinel.analyze_flow("xqzvpbfjktr.net", None, &[], &[]).unwrap();
        let history = sentinel.policy_store.history_for("xqzvpbfjktr.net", 10).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn credential_flow_to_unrelated_origin_needs_review() {
        let dir = TempDir::new().unwrap();
        let sentinel = test_sentinel(&dir).await;
        let flow = CredentialFlow {
            form_origin: "https://example.com/login".to_string(),
            submit_target: "https://attacker.net/collect".to_string(),
            has_password_field: true,
        };
        let verdict = sentinel.analyze_credential_flow(&flow).unwrap();
        assert!(verdict.requires_review());
    }

    #[tokio::test]
    async fn remember_decision_persists_a_policy() {
        let dir = TempDir::new().unwrap();
        let sentinel = test_sentinel(&dir).await;
        sentinel
            .remember_decision("always block xqzvpbfjktr.net", serde_json::json!({"domain": "xqzvpbfjktr.net"}), PolicyAction::Block)
            .unwrap();
        assert_eq!(sentinel.policy_store.list_policies().unwrap().len(), 1);
    }
}
