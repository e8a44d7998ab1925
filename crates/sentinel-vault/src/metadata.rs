//! Sidecar metadata persisted next to each quarantined file, as `<ID>.json`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarantineMetadata {
    pub original_url: String,
    pub filename: String,
    pub detection_time: String,
    pub sha256: String,
    pub file_size: u64,
    pub quarantine_id: String,
    pub rule_names: Vec<String>,
}
