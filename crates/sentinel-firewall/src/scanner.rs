//! Size-tiered content scanner.
//!
//! Wraps [`SemanticFirewall`]'s pattern/entropy scanning and
//! [`yara::match_rules`] signature matching behind a single entry point
//! that dispatches by content size (see [`ScanTier`]), hashes everything
//! with SHA-256 for IOC lookup, and applies an explicit fail-open/
//! fail-closed policy when a dependency (the IOC lookup) errors.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use sha2::{Digest, Sha256};

use crate::firewall::SemanticFirewall;
use crate::models::{ScanResult, ScanTier, ScannerConfig, ThreatType};
use crate::yara::{match_rules, SignatureRule};

/// Looks up whether a content hash is a known-bad indicator of compromise.
/// Implemented by `sentinel-registry`'s policy store in the assembled
/// binary; kept as a trait here so the firewall crate has no dependency on
/// the registry crate.
pub trait IocLookup: Send + Sync {
    /// Returns `Ok(true)` if `sha256_hex` is a known-bad hash, `Ok(false)`
    /// if known-good/unknown, `Err` if the lookup itself failed (e.g. the
    /// backing database is unreachable).
    fn is_known_bad_hash(&self, sha256_hex: &str) -> Result<bool, String>;
}

/// An [`IocLookup`] that always reports unknown, for callers that don't
/// wire up a real registry (tests, standalone CLI invocations).
pub struct NoIocLookup;

impl IocLookup for NoIocLookup {
    fn is_known_bad_hash(&self, _sha256_hex: &str) -> Result<bool, String> {
        Ok(false)
    }
}

/// Whether an IOC lookup failure should result in the content being
/// allowed through (fail-open, appropriate for a degraded but
/// non-critical dependency) or blocked outright (fail-closed, appropriate
/// when the deployment treats threat-intel availability as a hard
/// requirement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyFailurePolicy {
    FailOpen,
    FailClosed,
}

/// Scan counters, broken down by tier. Mirrors the worker pool's telemetry
/// pattern: plain atomics behind an `Arc`, incremented with `Relaxed`
/// ordering since these are observational counters, not synchronization
/// primitives.
#[derive(Debug, Default)]
pub struct ScanTelemetry {
    pub scans_small: AtomicU64,
    pub scans_medium: AtomicU64,
    pub scans_large: AtomicU64,
    pub oversized_skipped: AtomicU64,
    pub total_bytes_scanned: AtomicU64,
    pub peak_memory_bytes: AtomicU64,
    pub total_scan_time_micros: AtomicU64,
}

impl ScanTelemetry {
    fn record_peak(&self, bytes: u64) {
        self.peak_memory_bytes.fetch_max(bytes, Ordering::Relaxed);
    }
}

pub struct ContentScanner {
    firewall: SemanticFirewall,
    signatures: Vec<SignatureRule>,
    dependency_failure_policy: DependencyFailurePolicy,
    config: ScannerConfig,
    telemetry: Arc<ScanTelemetry>,
}

impl ContentScanner {
    pub fn new() -> Self {
        Self {
            firewall: SemanticFirewall::new(),
            signatures: Vec::new(),
            dependency_failure_policy: DependencyFailurePolicy::FailOpen,
            config: ScannerConfig::default(),
            telemetry: Arc::new(ScanTelemetry::default()),
        }
    }

    pub fn with_signatures(mut self, signatures: Vec<SignatureRule>) -> Self {
        self.signatures = signatures;
        self
    }

    pub fn with_dependency_failure_policy(mut self, policy: DependencyFailurePolicy) -> Self {
        self.dependency_failure_policy = policy;
        self
    }

    /// Replaces the size-tier configuration. Panics if `config` fails
    /// `ScannerConfig::validate` — an invalid config is a startup bug, not
    /// a runtime condition callers should need to handle.
    pub fn with_config(mut self, config: ScannerConfig) -> Self {
        config.validate().expect("invalid scanner config");
        self.config = config;
        self
    }

    pub fn telemetry(&self) -> Arc<ScanTelemetry> {
        self.telemetry.clone()
    }

    pub fn sha256_hex(data: &[u8]) -> String {
        format!("{:x}", Sha256::digest(data))
    }

    /// Scans `data`, dispatching by size per [`ScanTier`]. The IOC hash
    /// check always covers the full content, regardless of tier.
    /// Pattern/entropy scanning covers the whole payload for
    /// [`ScanTier::Small`], `chunk_size` chunks with `chunk_overlap` bytes
    /// of boundary replay for [`ScanTier::Medium`], exactly the first and
    /// last `large_file_scan_bytes` for [`ScanTier::Large`], and nothing
    /// at all for [`ScanTier::Oversized`] (which only updates telemetry).
    pub fn scan_bytes(&self, data: &[u8], iocs: &dyn IocLookup) -> ScanResult {
        let start = Instant::now();
        let tier = self.config.tier_for_size(data.len() as u64);
        let hash = Self::sha256_hex(data);

        let result = self.scan_bytes_inner(data, tier, &hash, iocs);
        self.record_telemetry(tier, data.len() as u64, start.elapsed());
        result
    }

    fn scan_bytes_inner(&self, data: &[u8], tier: ScanTier, hash: &str, iocs: &dyn IocLookup) -> ScanResult {
        match iocs.is_known_bad_hash(hash) {
            Ok(true) => {
                return ScanResult::Blocked {
                    threat: ThreatType::MalwareSignature,
                    confidence: 1.0,
                    detail: format!("content hash {hash} matches known-bad indicator"),
                };
            }
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(error = %err, "ioc lookup failed");
                if self.dependency_failure_policy == DependencyFailurePolicy::FailClosed {
                    return ScanResult::Blocked {
                        threat: ThreatType::MalwareSignature,
                        confidence: 0.0,
                        detail: "ioc lookup unavailable, failing closed".to_string(),
                    };
                }
            }
        }

        match tier {
            ScanTier::Small => self.scan_best_effort(data),
            ScanTier::Medium => self.scan_chunked(data),
            ScanTier::Large => self.scan_edges(data),
            ScanTier::Oversized => {
                tracing::warn!(bytes = data.len(), max = self.config.max_scan_size, "content exceeds max_scan_size, skipping pattern scan");
                ScanResult::Safe
            }
        }
    }

    /// Streams `data` in `chunk_size` windows, replaying the last
    /// `chunk_overlap` bytes of the previous window at the start of the
    /// next so a pattern straddling a chunk boundary is still caught.
    fn scan_chunked(&self, data: &[u8]) -> ScanResult {
        let chunk_size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;
        let stride = chunk_size - overlap;

        let mut pos = 0usize;
        loop {
            let window_start = pos.saturating_sub(overlap);
            let window_end = (window_start + chunk_size).min(data.len());
            let chunk = &data[window_start..window_end];

            let result = self.scan_best_effort(chunk);
            if !result.is_safe() {
                return result;
            }
            if window_end >= data.len() {
                break;
            }
            pos += stride;
        }
        ScanResult::Safe
    }

    /// Scans only the first and last `large_file_scan_bytes` of `data` —
    /// exactly two scans — or skips entirely if partial scanning is
    /// disabled.
    fn scan_edges(&self, data: &[u8]) -> ScanResult {
        if !self.config.partial_scan_enabled {
            tracing::info!(bytes = data.len(), "partial scanning disabled, skipping large file scan");
            return ScanResult::Safe;
        }

        let edge = self.config.large_file_scan_bytes as usize;
        let head_end = edge.min(data.len());
        let head_result = self.scan_best_effort(&data[..head_end]);
        if !head_result.is_safe() {
            return head_result;
        }

        let tail_start = data.len().saturating_sub(edge).max(head_end);
        self.scan_best_effort(&data[tail_start..])
    }

    /// Runs signature matching and the semantic firewall's pattern/entropy
    /// scan over `data`. Non-UTF-8 content is decoded lossily rather than
    /// treated as automatically safe: injection and malware signatures are
    /// ASCII, and this keeps opaque binary payloads subject to the same
    /// matcher as text.
    fn scan_best_effort(&self, data: &[u8]) -> ScanResult {
        let text = String::from_utf8_lossy(data);
        let signature_hits = match_rules(&text, &self.signatures);
        if let Some(name) = signature_hits.first() {
            return ScanResult::Blocked {
                threat: ThreatType::MalwareSignature,
                confidence: 0.95,
                detail: format!("matched signature '{name}'"),
            };
        }
        self.firewall.scan_input(&text)
    }

    fn record_telemetry(&self, tier: ScanTier, bytes: u64, elapsed: std::time::Duration) {
        match tier {
            ScanTier::Small => self.telemetry.scans_small.fetch_add(1, Ordering::Relaxed),
            ScanTier::Medium => self.telemetry.scans_medium.fetch_add(1, Ordering::Relaxed),
            ScanTier::Large => self.telemetry.scans_large.fetch_add(1, Ordering::Relaxed),
            ScanTier::Oversized => self.telemetry.oversized_skipped.fetch_add(1, Ordering::Relaxed),
        };
        self.telemetry.total_bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
        self.telemetry.record_peak(bytes.min(self.config.max_memory_per_scan));
        self.telemetry
            .total_scan_time_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }
}

impl Default for ContentScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct KnownBad(&'static str);
    impl IocLookup for KnownBad {
        fn is_known_bad_hash(&self, hash: &str) -> Result<bool, String> {
            Ok(hash == self.0)
        }
    }

    struct AlwaysErrors;
    impl IocLookup for AlwaysErrors {
        fn is_known_bad_hash(&self, _hash: &str) -> Result<bool, String> {
            Err("backend unreachable".to_string())
        }
    }

    #[test]
    fn safe_content_passes() {
        let scanner = ContentScanner::new();
        let result = scanner.scan_bytes(b"ordinary log line", &NoIocLookup);
        assert!(result.is_safe());
    }

    #[test]
    fn known_bad_hash_blocks_regardless_of_content() {
        let data = b"totally ordinary text";
        let hash = ContentScanner::sha256_hex(data);
        let scanner = ContentScanner::new();
        let result = scanner.scan_bytes(data, &KnownBad(Box::leak(hash.into_boxed_str())));
        assert!(result.is_blocked());
    }

    #[test]
    fn fail_open_allows_scan_to_continue_on_lookup_error() {
        let scanner = ContentScanner::new();
        let result = scanner.scan_bytes(b"ordinary content", &AlwaysErrors);
        assert!(result.is_safe());
    }

    #[test]
    fn fail_closed_blocks_on_lookup_error() {
        let scanner = ContentScanner::new().with_dependency_failure_policy(DependencyFailurePolicy::FailClosed);
        let result = scanner.scan_bytes(b"ordinary content", &AlwaysErrors);
        assert!(result.is_blocked());
    }

    #[test]
    fn signature_match_blocks() {
        let rules = vec![SignatureRule::new("test_sig", "forbidden_marker").unwrap()];
        let scanner = ContentScanner::new().with_signatures(rules);
        let result = scanner.scan_bytes(b"some text with forbidden_marker inside", &NoIocLookup);
        assert!(result.is_blocked());
    }

    #[test]
    fn tier_assignment_follows_configured_thresholds() {
        let config = ScannerConfig {
            small_threshold: 100,
            medium_threshold: 1000,
            max_scan_size: 10_000,
            ..ScannerConfig::default()
        };
        assert_eq!(config.tier_for_size(50), ScanTier::Small);
        assert_eq!(config.tier_for_size(100), ScanTier::Small);
        assert_eq!(config.tier_for_size(101), ScanTier::Medium);
        assert_eq!(config.tier_for_size(1000), ScanTier::Medium);
        assert_eq!(config.tier_for_size(1001), ScanTier::Large);
        assert_eq!(config.tier_for_size(10_000), ScanTier::Large);
        assert_eq!(config.tier_for_size(10_001), ScanTier::Oversized);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = ScannerConfig {
            small_threshold: 1000,
            medium_threshold: 100,
            ..ScannerConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad_overlap = ScannerConfig {
            chunk_size: 1024,
            chunk_overlap: 1024,
            ..ScannerConfig::default()
        };
        assert!(bad_overlap.validate().is_err());

        let bad_memory = ScannerConfig {
            chunk_size: 1024 * 1024,
            max_memory_per_scan: 1024,
            ..ScannerConfig::default()
        };
        assert!(bad_memory.validate().is_err());
    }

    #[test]
    fn medium_tier_catches_threat_straddling_a_chunk_boundary() {
        let config = ScannerConfig {
            small_threshold: 1024,
            medium_threshold: 10 * 1024 * 1024,
            max_scan_size: 20 * 1024 * 1024,
            chunk_size: 64 * 1024,
            chunk_overlap: 1024,
            ..ScannerConfig::default()
        };
        let marker = b"forbidden_marker";
        let boundary = config.chunk_size - (marker.len() / 2);
        let mut data = vec![b'a'; 5 * 1024 * 1024];
        data[boundary..boundary + marker.len()].copy_from_slice(marker);

        let rules = vec![SignatureRule::new("test_sig", "forbidden_marker").unwrap()];
        let scanner = ContentScanner::new().with_signatures(rules).with_config(config);
        let result = scanner.scan_bytes(&data, &NoIocLookup);
        assert!(result.is_blocked(), "expected the boundary-straddling marker to be caught by overlap replay");
        assert_eq!(scanner.telemetry().scans_medium.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn large_tier_scans_only_first_and_last_edge() {
        let config = ScannerConfig {
            small_threshold: 1024,
            medium_threshold: 4096,
            max_scan_size: 20 * 1024 * 1024,
            large_file_scan_bytes: 1024,
            ..ScannerConfig::default()
        };
        let mut data = vec![b'a'; 5 * 1024 * 1024];
        let marker = b"forbidden_marker";
        let mid = data.len() / 2;
        data[mid..mid + marker.len()].copy_from_slice(marker);

        let rules = vec![SignatureRule::new("test_sig", "forbidden_marker").unwrap()];
        let scanner = ContentScanner::new().with_signatures(rules).with_config(config);
        let result = scanner.scan_bytes(&data, &NoIocLookup);
        assert!(result.is_safe(), "a marker outside the scanned edges must not be found");
        assert_eq!(scanner.telemetry().scans_large.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn oversized_content_is_skipped_but_counted() {
        let config = ScannerConfig {
            small_threshold: 10,
            medium_threshold: 20,
            max_scan_size: 30,
            ..ScannerConfig::default()
        };
        let data = vec![b'a'; 31];
        let scanner = ContentScanner::new().with_config(config);
        let result = scanner.scan_bytes(&data, &NoIocLookup);
        assert!(result.is_safe());
        assert_eq!(scanner.telemetry().oversized_skipped.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn non_utf8_content_is_still_pattern_scanned() {
        let rules = vec![SignatureRule::new("test_sig", "forbidden_marker").unwrap()];
        let mut data = vec![0xFFu8, 0xFE, 0x00, 0xC0];
        data.extend_from_slice(b"forbidden_marker");
        let scanner = ContentScanner::new().with_signatures(rules);
        let result = scanner.scan_bytes(&data, &NoIocLookup);
        assert!(result.is_blocked(), "binary content containing a known signature must still be blocked");
    }

    #[test]
    fn telemetry_tracks_total_bytes_scanned() {
        let scanner = ContentScanner::new();
        scanner.scan_bytes(b"twelve bytes", &NoIocLookup);
        scanner.scan_bytes(b"more data here", &NoIocLookup);
        assert_eq!(scanner.telemetry().total_bytes_scanned.load(Ordering::Relaxed), 12 + 14);
        assert_eq!(scanner.telemetry().scans_small.load(Ordering::Relaxed), 2);
    }
}
