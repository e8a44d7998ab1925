//! # Behavioral Council
//!
//! Behavioral analyzers for traffic that has already passed the content
//! firewall: domain generation algorithm (DGA) detection, command-and-control
//! beacon timing analysis, phishing URL heuristics, browser fingerprinting
//! detection, and credential-flow (form submission) monitoring.
//!
//! Where [`sentinel_firewall`] asks "is this content malicious", this crate
//! asks "does this pattern of traffic look like malware operating", by
//! looking at sequences of requests rather than single payloads.
//!
//! ## Analyzers
//!
//! - [`dga`] — entropy/consonant-ratio/bigram-rarity scoring of domain labels
//! - [`c2`] — coefficient-of-variation analysis of request timing and size
//! - [`phishing`] — weighted indicator matching on URLs
//! - [`fingerprint`] — combination-aware scoring of fingerprinting techniques
//! - [`traffic`] — composite scoring across the above with throttled alerting
//! - [`forms`] — credential-flow classification and trust persistence
//!
//! Each analyzer returns a [`signal::BehaviorSignal`]; [`traffic::TrafficMonitor`]
//! is the entry point that combines dga/c2/phishing signals into a single
//! verdict per flow.

pub mod c2;
pub mod dga;
pub mod error;
pub mod fingerprint;
pub mod forms;
pub mod phishing;
pub mod signal;
pub mod traffic;

pub use c2::C2Analyzer;
pub use dga::DgaAnalyzer;
pub use error::CouncilError;
pub use fingerprint::FingerprintingDetector;
pub use forms::{CredentialFlow, FlowClassification, FormMonitor};
pub use phishing::PhishingAnalyzer;
pub use signal::BehaviorSignal;
pub use traffic::{TrafficAlert, TrafficMonitor};

/// Result type for council operations.
pub type Result<T> = std::result::Result<T, CouncilError>;

#[cfg(test)]
mod tests {
    #[test]
    fn test_crate_compiles() {
        let _ = std::hint::black_box(1);
    }
}
