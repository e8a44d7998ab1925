//! Health check registry and graceful-degradation state.
//!
//! Components that depend on an external resource (SQLite file, firewall
//! backend binary, threat-intel endpoint) register a named probe here. The
//! top-level facade polls the registry to decide whether to run in full
//! mode or fall back to a degraded one (per the fail-open/fail-closed split
//! documented for dependency failures vs. active security refusals).

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{PrimitivesError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

type Probe = Box<dyn Fn() -> HealthStatus + Send + Sync>;

#[derive(Default)]
pub struct HealthRegistry {
    probes: Mutex<HashMap<String, Probe>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, probe: impl Fn() -> HealthStatus + Send + Sync + 'static) {
        self.probes
            .lock()
            .expect("health registry mutex poisoned")
            .insert(name.into(), Box::new(probe));
    }

    pub fn check(&self, name: &str) -> Result<HealthStatus> {
        let probes = self.probes.lock().expect("health registry mutex poisoned");
        let probe = probes
            .get(name)
            .ok_or_else(|| PrimitivesError::UnknownHealthCheck(name.to_string()))?;
        Ok(probe())
    }

    /// Aggregate status: unhealthy if any probe is unhealthy, degraded if
    /// any probe is degraded, healthy otherwise. Empty registry is healthy.
    pub fn overall(&self) -> HealthStatus {
        let probes = self.probes.lock().expect("health registry mutex poisoned");
        let mut worst = HealthStatus::Healthy;
        for probe in probes.values() {
            match probe() {
                HealthStatus::Unhealthy => return HealthStatus::Unhealthy,
                HealthStatus::Degraded => worst = HealthStatus::Degraded,
                HealthStatus::Healthy => {}
            }
        }
        worst
    }

    pub fn names(&self) -> Vec<String> {
        let probes = self.probes.lock().expect("health registry mutex poisoned");
        probes.keys().cloned().collect()
    }
}

/// Degradation level the top-level facade runs under. Distinct from
/// [`HealthStatus`]: health describes a single dependency, this describes
/// the whole system's operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DegradationLevel {
    /// All dependencies healthy, full pipeline runs.
    Full,
    /// Non-critical dependency down (e.g. threat-intel feed); scanning
    /// continues with reduced detection coverage.
    Reduced,
    /// Critical dependency down (e.g. quarantine vault unwritable); the
    /// system fails closed and blocks rather than scans.
    FailClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_probe_errors() {
        let registry = HealthRegistry::new();
        assert!(matches!(
            registry.check("missing"),
            Err(PrimitivesError::UnknownHealthCheck(_))
        ));
    }

    #[test]
    fn overall_reflects_worst_probe() {
        let registry = HealthRegistry::new();
        registry.register("db", || HealthStatus::Healthy);
        registry.register("intel_feed", || HealthStatus::Degraded);
        assert_eq!(registry.overall(), HealthStatus::Degraded);

        registry.register("vault", || HealthStatus::Unhealthy);
        assert_eq!(registry.overall(), HealthStatus::Unhealthy);
    }

    #[test]
    fn degradation_levels_order_by_severity() {
        assert!(DegradationLevel::Full < DegradationLevel::Reduced);
        assert!(DegradationLevel::Reduced < DegradationLevel::FailClosed);
    }
}
