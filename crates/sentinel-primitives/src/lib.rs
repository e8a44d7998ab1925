//! Low-level building blocks shared across the sentinel workspace:
//! constant-time comparison, circuit breakers, retry policy, a bounded LRU
//! cache, health/degradation tracking, and the append-only audit log.
//!
//! None of this crate is security-policy-aware; it exists so that the
//! policy-aware crates (`sentinel-registry`, `sentinel-council`,
//! `sentinel-firewall`, `sentinel-monitor`, `sentinel-vault`,
//! `sentinel-isolator`) don't each reinvent the same primitives with
//! slightly different bugs.

mod audit;
mod circuit_breaker;
mod compare;
mod error;
mod health;
mod lru;
mod retry;

pub use audit::{AuditEvent, AuditEventType, AuditLog};
pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use compare::{constant_time_eq, constant_time_eq_str};
pub use error::{PrimitivesError, Result};
pub use health::{DegradationLevel, HealthRegistry, HealthStatus};
pub use lru::LruCache;
pub use retry::RetryPolicy;
