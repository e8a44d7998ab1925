//! Traffic monitor: combines the DGA, C2, and phishing analyzers into a
//! single composite score per observed flow, with bookkeeping to avoid
//! re-alerting on the same domain every time it's seen and to bound
//! memory use under sustained traffic.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sentinel_primitives::LruCache;
use serde::{Deserialize, Serialize};

use crate::c2::C2Analyzer;
use crate::dga::DgaAnalyzer;
use crate::phishing::PhishingAnalyzer;
use crate::signal::BehaviorSignal;

const SEEN_DOMAINS_CAPACITY: usize = 500;
const ALERT_THROTTLE: Duration = Duration::from_secs(300);
const ALERT_RING_CAPACITY: usize = 100;

const DGA_WEIGHT: f64 = 0.4;
const C2_WEIGHT: f64 = 0.35;
const PHISHING_WEIGHT: f64 = 0.25;
const COMPOSITE_ALERT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficAlert {
    pub subject: String,
    pub composite_score: f64,
    pub signals: Vec<BehaviorSignal>,
}

pub struct TrafficMonitor {
    dga: DgaAnalyzer,
    c2: C2Analyzer,
    phishing: PhishingAnalyzer,
    seen_domains: Mutex<LruCache<String, ()>>,
    last_alerted: Mutex<LruCache<String, Instant>>,
    alerts: Mutex<VecDeque<TrafficAlert>>,
}

impl TrafficMonitor {
    pub fn new() -> Self {
        Self {
            dga: DgaAnalyzer,
            c2: C2Analyzer,
            phishing: PhishingAnalyzer,
            seen_domains: Mutex::new(LruCache::new(SEEN_DOMAINS_CAPACITY)),
            last_alerted: Mutex::new(LruCache::new(SEEN_DOMAINS_CAPACITY)),
            alerts: Mutex::new(VecDeque::with_capacity(ALERT_RING_CAPACITY)),
        }
    }

    /// Analyzes one flow to `domain` (optionally via `url`), with
    /// `interval_seconds`/`payload_sizes` describing the flow's timing and
    /// size history for C2 beacon detection. Returns `None` when nothing
    /// crosses the composite threshold, or when the subject was already
    /// alerted on within the throttle window.
    pub fn analyze_flow(&self, domain: &str, url: Option<&str>, interval_seconds: &[f64], payload_sizes: &[f64]) -> Option<TrafficAlert> {
        self.seen_domains.lock().expect("traffic monitor mutex poisoned").put(domain.to_string(), ());

        let dga_signal = self.dga.analyze(domain);
        let c2_signal = self.c2.analyze(interval_seconds, payload_sizes);
        let phishing_signal = url.map(|u| self.phishing.analyze(u)).unwrap_or_else(|| BehaviorSignal::benign("phishing_url"));

        let composite = dga_signal.confidence * DGA_WEIGHT
            + c2_signal.confidence * C2_WEIGHT
            + phishing_signal.confidence * PHISHING_WEIGHT;

        if composite < COMPOSITE_ALERT_THRESHOLD {
            return None;
        }

        if self.is_throttled(domain) {
            return None;
        }

        let alert = TrafficAlert {
            subject: domain.to_string(),
            composite_score: composite,
            signals: vec![dga_signal, c2_signal, phishing_signal],
        };
        self.record_alert(alert.clone());
        Some(alert)
    }

    fn is_throttled(&self, subject: &str) -> bool {
        let mut last_alerted = self.last_alerted.lock().expect("traffic monitor mutex poisoned");
        if let Some(at) = last_alerted.get(&subject.to_string()) {
            if at.elapsed() < ALERT_THROTTLE {
                return true;
            }
        }
        last_alerted.put(subject.to_string(), Instant::now());
        false
    }

    fn record_alert(&self, alert: TrafficAlert) {
        let mut alerts = self.alerts.lock().expect("traffic monitor mutex poisoned");
        if alerts.len() >= ALERT_RING_CAPACITY {
            alerts.pop_front();
        }
        alerts.push_back(alert);
    }

    pub fn recent_alerts(&self) -> Vec<TrafficAlert> {
        self.alerts.lock().expect("traffic monitor mutex poisoned").iter().cloned().collect()
    }
}

impl Default for TrafficMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benign_flow_produces_no_alert() {
        let monitor = TrafficMonitor::new();
        let alert = monitor.analyze_flow("example.com", None, &[], &[]);
        assert!(alert.is_none());
    }

    #[test]
    fn dga_like_domain_alerts_once_then_throttles() {
        let monitor = TrafficMonitor::new();
        let first = monitor.analyze_flow("xqzvpbfjktr.net", None, &[], &[]);
        assert!(first.is_some());
        let second = monitor.analyze_flow("xqzvpbfjktr.net", None, &[], &[]);
        assert!(second.is_none(), "expected throttled re-alert to be suppressed");
    }

    #[test]
    fn ring_buffer_caps_alert_history() {
        let monitor = TrafficMonitor::new();
        for i in 0..(ALERT_RING_CAPACITY + 10) {
            monitor.analyze_flow(&format!("xqzvpbfjktr{i}.net"), None, &[], &[]);
        }
        assert!(monitor.recent_alerts().len() <= ALERT_RING_CAPACITY);
    }
}
