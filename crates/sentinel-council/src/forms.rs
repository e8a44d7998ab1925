//! Credential-flow monitor.
//!
//! Tracks where password-type form fields get submitted to. A login form
//! hosted on `accounts.example.com` posting back to `accounts.example.com`
//! is unremarkable; the same form posting to an unrelated third-party
//! origin is exactly the shape of a credential-harvesting page embedded via
//! a compromised ad, iframe, or extension. Once a user (or an operator,
//! via policy) has explicitly allowed a cross-origin submission target, it
//! is remembered so the same flow doesn't alert on every subsequent visit.

use std::collections::HashSet;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::signal::BehaviorSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowClassification {
    /// Submission target shares a registrable origin with the form, or was
    /// previously allow-listed.
    Trusted,
    /// Cross-origin submission not yet seen before; flagged but not blocked.
    Unverified,
    /// Cross-origin submission to a destination explicitly blocked.
    Blocked,
}

#[derive(Debug, Clone)]
pub struct CredentialFlow {
    pub form_origin: String,
    pub submit_target: String,
    pub has_password_field: bool,
}

/// Persists operator/user decisions about specific (form_origin,
/// submit_target) pairs across the process lifetime of the monitor.
#[derive(Default)]
struct Relationships {
    trusted: HashSet<(String, String)>,
    blocked: HashSet<(String, String)>,
}

pub struct FormMonitor {
    relationships: Mutex<Relationships>,
    /// One-shot overrides granted for a single autofill: consumed on use,
    /// and the origin's entry is pruned once its override set is empty.
    autofill_overrides: Mutex<std::collections::HashMap<String, HashSet<String>>>,
}

impl FormMonitor {
    pub fn new() -> Self {
        Self {
            relationships: Mutex::new(Relationships::default()),
            autofill_overrides: Mutex::new(std::collections::HashMap::new()),
        }
    }

    /// Grants a one-time autofill exception for `form_origin` filling a
    /// field destined for `submit_target`, regardless of trust state.
    pub fn grant_autofill_override(&self, form_origin: &str, submit_target: &str) {
        let mut overrides = self.autofill_overrides.lock().expect("form monitor mutex poisoned");
        overrides.entry(form_origin.to_string()).or_default().insert(submit_target.to_string());
    }

    /// Consumes a previously granted override, if one exists. Returns
    /// whether the override was present.
    pub fn consume_autofill_override(&self, form_origin: &str, submit_target: &str) -> bool {
        let mut overrides = self.autofill_overrides.lock().expect("form monitor mutex poisoned");
        let Some(targets) = overrides.get_mut(form_origin) else {
            return false;
        };
        let consumed = targets.remove(submit_target);
        if targets.is_empty() {
            overrides.remove(form_origin);
        }
        consumed
    }

    pub fn trust(&self, form_origin: &str, submit_target: &str) {
        let mut rel = self.relationships.lock().expect("form monitor mutex poisoned");
        let key = (form_origin.to_string(), submit_target.to_string());
        rel.blocked.remove(&key);
        rel.trusted.insert(key);
    }

    pub fn block(&self, form_origin: &str, submit_target: &str) {
        let mut rel = self.relationships.lock().expect("form monitor mutex poisoned");
        let key = (form_origin.to_string(), submit_target.to_string());
        rel.trusted.remove(&key);
        rel.blocked.insert(key);
    }

    pub fn classify(&self, flow: &CredentialFlow) -> FlowClassification {
        if !flow.has_password_field {
            return FlowClassification::Trusted;
        }
        if same_registrable_origin(&flow.form_origin, &flow.submit_target) {
            return FlowClassification::Trusted;
        }

        let rel = self.relationships.lock().expect("form monitor mutex poisoned");
        let key = (flow.form_origin.clone(), flow.submit_target.clone());
        if rel.blocked.contains(&key) {
            FlowClassification::Blocked
        } else if rel.trusted.contains(&key) {
            FlowClassification::Trusted
        } else {
            FlowClassification::Unverified
        }
    }

    pub fn analyze(&self, flow: &CredentialFlow) -> BehaviorSignal {
        match self.classify(flow) {
            FlowClassification::Trusted => BehaviorSignal::benign("credential_flow"),
            FlowClassification::Unverified => BehaviorSignal::new(
                "credential_flow",
                0.6,
                format!(
                    "password field on {} submits cross-origin to {} with no prior trust decision",
                    flow.form_origin, flow.submit_target
                ),
            ),
            FlowClassification::Blocked => BehaviorSignal::new(
                "credential_flow",
                1.0,
                format!(
                    "password field on {} submits to {}, a previously blocked destination",
                    flow.form_origin, flow.submit_target
                ),
            ),
        }
    }
}

impl Default for FormMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn host_only(origin: &str) -> &str {
    let host = origin.split("://").nth(1).unwrap_or(origin);
    host.split(['/', ':']).next().unwrap_or(host)
}

fn registrable_domain(origin: &str) -> String {
    let labels: Vec<&str> = host_only(origin).split('.').collect();
    if labels.len() >= 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        labels.join(".")
    }
}

fn same_registrable_origin(a: &str, b: &str) -> bool {
    registrable_domain(a) == registrable_domain(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(origin: &str, target: &str) -> CredentialFlow {
        CredentialFlow {
            form_origin: origin.to_string(),
            submit_target: target.to_string(),
            has_password_field: true,
        }
    }

    #[test]
    fn same_site_submission_is_trusted() {
        let monitor = FormMonitor::new();
        let f = flow("https://accounts.example.com/login", "https://login.example.com/api");
        assert_eq!(monitor.classify(&f), FlowClassification::Trusted);
    }

    #[test]
    fn cross_origin_submission_is_unverified_by_default() {
        let monitor = FormMonitor::new();
        let f = flow("https://example.com/login", "https://attacker.net/collect");
        assert_eq!(monitor.classify(&f), FlowClassification::Unverified);
    }

    #[test]
    fn trusting_a_pair_persists_the_decision() {
        let monitor = FormMonitor::new();
        let f = flow("https://example.com/login", "https://sso-partner.net/api");
        assert_eq!(monitor.classify(&f), FlowClassification::Unverified);
        monitor.trust("https://example.com/login", "https://sso-partner.net/api");
        assert_eq!(monitor.classify(&f), FlowClassification::Trusted);
    }

    #[test]
    fn blocking_a_pair_overrides_later_sightings() {
        let monitor = FormMonitor::new();
        let f = flow("https://example.com/login", "https://attacker.net/collect");
        monitor.block("https://example.com/login", "https://attacker.net/collect");
        assert_eq!(monitor.classify(&f), FlowClassification::Blocked);
        assert_eq!(monitor.analyze(&f).confidence, 1.0);
    }

    #[test]
    fn forms_without_password_fields_are_always_trusted() {
        let monitor = FormMonitor::new();
        let mut f = flow("https://example.com/search", "https://attacker.net/collect");
        f.has_password_field = false;
        assert_eq!(monitor.classify(&f), FlowClassification::Trusted);
    }

    #[test]
    fn autofill_override_is_consumed_exactly_once() {
        let monitor = FormMonitor::new();
        monitor.grant_autofill_override("https://example.com", "https://partner.net");
        assert!(monitor.consume_autofill_override("https://example.com", "https://partner.net"));
        assert!(!monitor.consume_autofill_override("https://example.com", "https://partner.net"));
    }

    #[test]
    fn unrelated_override_is_not_consumed() {
        let monitor = FormMonitor::new();
        monitor.grant_autofill_override("https://example.com", "https://partner.net");
        assert!(!monitor.consume_autofill_override("https://example.com", "https://other.net"));
    }
}
