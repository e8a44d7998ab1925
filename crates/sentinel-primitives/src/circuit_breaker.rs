//! Circuit breaker for calls into flaky dependencies (threat-intel feeds,
//! firewall backends, anything reachable over the network or a subprocess).
//!
//! Three states, classic half-open probe design:
//!
//! ```text
//! Closed --(failures >= threshold)--> Open --(cooldown elapsed)--> HalfOpen
//! HalfOpen --(success)--> Closed
//! HalfOpen --(failure)--> Open
//! ```

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{PrimitivesError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

struct Inner {
    state: CircuitState,
    failure_count: u32,
    opened_at: Option<Instant>,
}

/// Guards a single dependency. Cheap to construct; share behind an `Arc`
/// when multiple tasks call the same downstream.
pub struct CircuitBreaker {
    failure_threshold: u32,
    cooldown: Duration,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            failure_threshold,
            cooldown,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                failure_count: 0,
                opened_at: None,
            }),
        }
    }

    pub fn state(&self) -> CircuitState {
        let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
        self.transition_if_cooled_down(&mut inner);
        inner.state
    }

    fn transition_if_cooled_down(&self, inner: &mut Inner) {
        if inner.state == CircuitState::Open {
            if let Some(opened_at) = inner.opened_at {
                if opened_at.elapsed() >= self.cooldown {
                    inner.state = CircuitState::HalfOpen;
                }
            }
        }
    }

    /// Returns `Err(CircuitOpen)` without invoking `f` when the breaker is
    /// tripped; otherwise runs `f` and records the outcome.
    pub async fn call<F, Fut, T, E>(&self, f: F) -> Result<std::result::Result<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, E>>,
    {
        {
            let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
            self.transition_if_cooled_down(&mut inner);
            if inner.state == CircuitState::Open {
                return Err(PrimitivesError::CircuitOpen);
            }
        }

        let outcome = f().await;

        let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
        match &outcome {
            Ok(_) => {
                inner.state = CircuitState::Closed;
                inner.failure_count = 0;
                inner.opened_at = None;
            }
            Err(_) => {
                inner.failure_count += 1;
                if inner.state == CircuitState::HalfOpen || inner.failure_count >= self.failure_threshold {
                    inner.state = CircuitState::Open;
                    inner.opened_at = Some(Instant::now());
                }
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stays_closed_below_threshold() {
        let breaker = CircuitBreaker::new(3, Duration::from_millis(50));
        for _ in 0..2 {
            let _ = breaker
                .call(|| async { Err::<(), _>("boom") })
                .await
                .unwrap();
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn opens_after_threshold_and_rejects() {
        let breaker = CircuitBreaker::new(2, Duration::from_millis(50));
        for _ in 0..2 {
            let _ = breaker
                .call(|| async { Err::<(), _>("boom") })
                .await
                .unwrap();
        }
        assert_eq!(breaker.state(), CircuitState::Open);
        let result = breaker.call(|| async { Ok::<_, &str>(()) }).await;
        assert!(matches!(result, Err(PrimitivesError::CircuitOpen)));
    }

    #[tokio::test]
    async fn half_open_probe_recovers_on_success() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(10));
        let _ = breaker
            .call(|| async { Err::<(), _>("boom") })
            .await
            .unwrap();
        assert_eq!(breaker.state(), CircuitState::Open);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        let _ = breaker.call(|| async { Ok::<_, &str>(()) }).await.unwrap();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn half_open_probe_reopens_on_failure() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(10));
        let _ = breaker
            .call(|| async { Err::<(), _>("boom") })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        let _ = breaker
            .call(|| async { Err::<(), _>("boom again") })
            .await
            .unwrap();
        assert_eq!(breaker.state(), CircuitState::Open);
    }
}
