//! Configuration for the Sentinel security facade.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentinelConfig {
    pub registry: RegistryConfig,
    pub vault: VaultConfig,
    pub firewall: FirewallConfig,
    pub monitor: MonitorConfig,
    pub isolator: IsolatorConfig,
    pub global: GlobalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub db_path: PathBuf,
    pub threat_intel_min_confidence: f64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./sentinel_registry.db"),
            threat_intel_min_confidence: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    pub quarantine_dir: PathBuf,
    pub restore_dir: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            quarantine_dir: PathBuf::from("./quarantine"),
            restore_dir: PathBuf::from("./restored"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallConfig {
    pub dependency_failure_policy: DependencyFailureSetting,
    pub size_tiers: sentinel_firewall::ScannerConfig,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            dependency_failure_policy: DependencyFailureSetting::FailClosed,
            size_tiers: sentinel_firewall::ScannerConfig::default(),
        }
    }
}

/// Mirrors `sentinel_firewall::scanner::DependencyFailurePolicy`, kept as a
/// distinct serde-friendly type so the config schema doesn't couple to the
/// firewall crate's internal enum representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyFailureSetting {
    FailOpen,
    FailClosed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub queue_capacity: usize,
    pub worker_count: usize,
    pub job_timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1_000,
            worker_count: 4,
            job_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolatorConfig {
    pub enabled: bool,
    pub dry_run: bool,
}

impl Default for IsolatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Errors result in Block instead of Allow.
    pub fail_closed: bool,
    pub audit_logging: bool,
    pub audit_log_path: PathBuf,
    /// Short-circuit the pipeline on the first phase that blocks.
    pub short_circuit: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            fail_closed: true,
            audit_logging: true,
            audit_log_path: PathBuf::from("./sentinel_audit.jsonl"),
            short_circuit: true,
        }
    }
}

impl SentinelConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_fail_closed() {
        let config = SentinelConfig::default();
        assert!(config.global.fail_closed);
        assert_eq!(config.monitor.worker_count, 4);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = SentinelConfig::default();
        let rendered = config.to_toml_string().unwrap();
        let parsed = SentinelConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed.monitor.queue_capacity, config.monitor.queue_capacity);
        assert_eq!(parsed.global.fail_closed, config.global.fail_closed);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SentinelConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SentinelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.vault.quarantine_dir, config.vault.quarantine_dir);
    }
}
