//! Shared result type every behavioral analyzer produces.

use serde::{Deserialize, Serialize};

/// One analyzer's opinion on a single observation (a domain name, a flow,
/// a form submission). `confidence` is always in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSignal {
    pub analyzer: &'static str,
    pub confidence: f64,
    pub detail: String,
}

impl BehaviorSignal {
    pub fn new(analyzer: &'static str, confidence: f64, detail: impl Into<String>) -> Self {
        Self {
            analyzer,
            confidence: confidence.clamp(0.0, 1.0),
            detail: detail.into(),
        }
    }

    pub fn benign(analyzer: &'static str) -> Self {
        Self::new(analyzer, 0.0, "no indicators")
    }
}
