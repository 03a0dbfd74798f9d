//! Circuit breaker for broker calls.
//!
//! Stops hammering a failing broker and fails fast until it recovers.
//!
//! # State Machine
//!
//! ```text
//! CLOSED → OPEN       (requests >= minimum AND failure ratio >= threshold)
//! OPEN → HALF_OPEN    (open timeout elapsed, checked on the next call or read)
//! HALF_OPEN → CLOSED  (every trial call succeeded)
//! HALF_OPEN → OPEN    (any trial call failed)
//! ```
//!
//! All state lives behind one mutex, so each read-transition-record step is
//! atomic for concurrent callers.
//!
//! # Example
//!
//! ```rust,ignore
//! use strangle_broker::resilience::{CallOutcome, CircuitBreaker, CircuitBreakerConfig};
//!
//! let breaker = CircuitBreaker::new("tradier", CircuitBreakerConfig::default());
//!
//! match breaker.try_acquire() {
//!     Some(permit) => {
//!         let result = make_api_call().await;
//!         permit.record(if result.is_ok() { CallOutcome::Success } else { CallOutcome::Failure });
//!     }
//!     None => { /* open, fail fast */ }
//! }
//! ```

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::observability;

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitBreakerState {
    /// Calls flow normally.
    Closed,
    /// Calls are rejected.
    Open,
    /// A limited number of trial calls are let through.
    HalfOpen,
}

impl CircuitBreakerState {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "CLOSED",
            Self::Open => "OPEN",
            Self::HalfOpen => "HALF_OPEN",
        }
    }
}

impl std::fmt::Display for CircuitBreakerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Failure ratio that opens the circuit (0.0-1.0).
    pub failure_ratio_threshold: f64,
    /// Requests in the interval before the ratio is evaluated.
    pub minimum_requests: u32,
    /// Closed-state counting interval. Zero never resets the counts.
    pub interval: Duration,
    /// Time spent `OPEN` before trial calls are allowed.
    pub open_timeout: Duration,
    /// Trial calls allowed while `HALF_OPEN`.
    pub half_open_max_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_ratio_threshold: 0.6,
            minimum_requests: 5,
            interval: Duration::from_secs(60),
            open_timeout: Duration::from_secs(30),
            half_open_max_calls: 3,
        }
    }
}

/// How a finished call affects the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// Counts toward health.
    Success,
    /// Counts against health.
    Failure,
    /// Says nothing about broker health. Not counted; a half-open trial slot
    /// is released.
    Neutral,
}

/// Request counts within the current interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitCounts {
    /// Calls admitted.
    pub requests: u32,
    /// Calls that failed.
    pub failures: u32,
    /// Calls that succeeded.
    pub successes: u32,
}

impl CircuitCounts {
    #[allow(clippy::cast_precision_loss)]
    fn failure_ratio(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        f64::from(self.failures) / f64::from(self.requests)
    }
}

#[derive(Debug)]
struct Inner {
    state: CircuitBreakerState,
    /// Bumped on every transition; outcomes from an older generation are
    /// ignored.
    generation: u64,
    counts: CircuitCounts,
    interval_started: Instant,
    opened_at: Option<Instant>,
    half_open_admitted: u32,
    half_open_successes: u32,
}

/// Circuit breaker for one wrapped service.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker.
    #[must_use]
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner {
                state: CircuitBreakerState::Closed,
                generation: 0,
                counts: CircuitCounts::default(),
                interval_started: Instant::now(),
                opened_at: None,
                half_open_admitted: 0,
                half_open_successes: 0,
            }),
        }
    }

    /// Get the service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Get the current state, applying any due time-based transition.
    #[must_use]
    pub fn state(&self) -> CircuitBreakerState {
        let mut inner = self.lock();
        self.advance(&mut inner, Instant::now());
        inner.state
    }

    /// Get the counts of the current interval.
    #[must_use]
    pub fn counts(&self) -> CircuitCounts {
        let mut inner = self.lock();
        self.advance(&mut inner, Instant::now());
        inner.counts
    }

    /// Ask to make a call. `None` means the circuit rejects it.
    ///
    /// The returned permit must be settled with [`CallPermit::record`];
    /// dropping it unsettled records [`CallOutcome::Neutral`].
    #[must_use]
    pub fn try_acquire(&self) -> Option<CallPermit<'_>> {
        let mut inner = self.lock();
        self.advance(&mut inner, Instant::now());

        match inner.state {
            CircuitBreakerState::Closed => {}
            CircuitBreakerState::Open => return None,
            CircuitBreakerState::HalfOpen => {
                if inner.half_open_admitted >= self.config.half_open_max_calls {
                    return None;
                }
                inner.half_open_admitted += 1;
            }
        }
        inner.counts.requests = inner.counts.requests.saturating_add(1);

        Some(CallPermit {
            breaker: self,
            generation: inner.generation,
            settled: false,
        })
    }

    /// Force the circuit open (for operators or tests).
    pub fn force_open(&self) {
        let mut inner = self.lock();
        self.transition(&mut inner, CircuitBreakerState::Open, Instant::now());
    }

    /// Force the circuit closed (for operators or tests).
    pub fn force_close(&self) {
        let mut inner = self.lock();
        self.transition(&mut inner, CircuitBreakerState::Closed, Instant::now());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn on_outcome(&self, generation: u64, outcome: CallOutcome) {
        let mut inner = self.lock();
        let now = Instant::now();
        self.advance(&mut inner, now);

        if inner.generation != generation {
            return;
        }

        match inner.state {
            CircuitBreakerState::Closed => match outcome {
                CallOutcome::Success => {
                    inner.counts.successes = inner.counts.successes.saturating_add(1);
                }
                CallOutcome::Failure => {
                    inner.counts.failures = inner.counts.failures.saturating_add(1);
                    if inner.counts.requests >= self.config.minimum_requests
                        && inner.counts.failure_ratio() >= self.config.failure_ratio_threshold
                    {
                        self.transition(&mut inner, CircuitBreakerState::Open, now);
                    }
                }
                CallOutcome::Neutral => {
                    inner.counts.requests = inner.counts.requests.saturating_sub(1);
                }
            },
            CircuitBreakerState::HalfOpen => match outcome {
                CallOutcome::Success => {
                    inner.counts.successes = inner.counts.successes.saturating_add(1);
                    inner.half_open_successes += 1;
                    if inner.half_open_successes >= self.config.half_open_max_calls {
                        self.transition(&mut inner, CircuitBreakerState::Closed, now);
                    }
                }
                CallOutcome::Failure => {
                    self.transition(&mut inner, CircuitBreakerState::Open, now);
                }
                CallOutcome::Neutral => {
                    inner.counts.requests = inner.counts.requests.saturating_sub(1);
                    inner.half_open_admitted = inner.half_open_admitted.saturating_sub(1);
                }
            },
            CircuitBreakerState::Open => {}
        }
    }

    /// Apply time-based transitions: interval rollover while `CLOSED` and
    /// `OPEN` → `HALF_OPEN` once the open timeout has elapsed.
    fn advance(&self, inner: &mut Inner, now: Instant) {
        match inner.state {
            CircuitBreakerState::Closed => {
                if !self.config.interval.is_zero()
                    && now.duration_since(inner.interval_started) >= self.config.interval
                {
                    inner.generation += 1;
                    inner.counts = CircuitCounts::default();
                    inner.interval_started = now;
                }
            }
            CircuitBreakerState::Open => {
                if let Some(opened) = inner.opened_at
                    && now.duration_since(opened) >= self.config.open_timeout
                {
                    self.transition(inner, CircuitBreakerState::HalfOpen, now);
                }
            }
            CircuitBreakerState::HalfOpen => {}
        }
    }

    fn transition(&self, inner: &mut Inner, to: CircuitBreakerState, now: Instant) {
        let from = inner.state;
        if from == to {
            return;
        }

        inner.state = to;
        inner.generation += 1;
        inner.counts = CircuitCounts::default();
        inner.interval_started = now;
        inner.half_open_admitted = 0;
        inner.half_open_successes = 0;
        inner.opened_at = (to == CircuitBreakerState::Open).then_some(now);

        match to {
            CircuitBreakerState::Open => tracing::warn!(
                name = %self.name,
                from = %from,
                to = %to,
                "Circuit breaker opened"
            ),
            CircuitBreakerState::HalfOpen => tracing::info!(
                name = %self.name,
                from = %from,
                to = %to,
                "Circuit breaker testing"
            ),
            CircuitBreakerState::Closed => tracing::info!(
                name = %self.name,
                from = %from,
                to = %to,
                "Circuit breaker closed"
            ),
        }
        observability::record_circuit_breaker_transition(&self.name, to.as_str());
    }
}

/// Admission to make one call through a [`CircuitBreaker`].
#[derive(Debug)]
#[must_use = "an unsettled permit records a neutral outcome when dropped"]
pub struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    generation: u64,
    settled: bool,
}

impl CallPermit<'_> {
    /// Report how the call went.
    pub fn record(mut self, outcome: CallOutcome) {
        self.settled = true;
        self.breaker.on_outcome(self.generation, outcome);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_outcome(self.generation, CallOutcome::Neutral);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_ratio_threshold: 0.5,
            minimum_requests: 4,
            interval: Duration::ZERO,
            open_timeout: Duration::from_millis(10),
            half_open_max_calls: 2,
        }
    }

    fn call(breaker: &CircuitBreaker, outcome: CallOutcome) {
        breaker
            .try_acquire()
            .expect("call should be permitted")
            .record(outcome);
    }

    fn trip(breaker: &CircuitBreaker) {
        for _ in 0..4 {
            call(breaker, CallOutcome::Failure);
        }
        assert_eq!(breaker.state(), CircuitBreakerState::Open);
    }

    #[test]
    fn test_default_config() {
        let config = CircuitBreakerConfig::default();
        assert!((config.failure_ratio_threshold - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.minimum_requests, 5);
        assert_eq!(config.half_open_max_calls, 3);
    }

    #[test]
    fn test_initial_state_is_closed() {
        let breaker = CircuitBreaker::new("test", config());
        assert_eq!(breaker.state(), CircuitBreakerState::Closed);
        assert!(breaker.try_acquire().is_some());
    }

    #[test]
    fn test_closed_to_open_transition() {
        let breaker = CircuitBreaker::new("test", config());

        call(&breaker, CallOutcome::Success);
        call(&breaker, CallOutcome::Success);
        call(&breaker, CallOutcome::Failure);
        assert_eq!(breaker.state(), CircuitBreakerState::Closed);
        call(&breaker, CallOutcome::Failure);

        assert_eq!(breaker.state(), CircuitBreakerState::Open);
        assert!(breaker.try_acquire().is_none());
    }

    #[test]
    fn test_minimum_requests_required() {
        let breaker = CircuitBreaker::new("test", config());
        for _ in 0..3 {
            call(&breaker, CallOutcome::Failure);
        }
        assert_eq!(breaker.state(), CircuitBreakerState::Closed);
        assert_eq!(breaker.counts().failures, 3);
    }

    #[test]
    fn test_ratio_below_threshold_stays_closed() {
        let breaker = CircuitBreaker::new("test", config());
        for _ in 0..6 {
            call(&breaker, CallOutcome::Success);
        }
        call(&breaker, CallOutcome::Failure);
        call(&breaker, CallOutcome::Failure);
        assert_eq!(breaker.state(), CircuitBreakerState::Closed);
    }

    #[test]
    fn test_neutral_outcomes_are_not_counted() {
        let breaker = CircuitBreaker::new("test", config());
        for _ in 0..10 {
            call(&breaker, CallOutcome::Neutral);
        }
        assert_eq!(breaker.counts(), CircuitCounts::default());
        assert_eq!(breaker.state(), CircuitBreakerState::Closed);
    }

    #[test]
    fn test_interval_resets_counts() {
        let breaker = CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                interval: Duration::from_millis(10),
                ..config()
            },
        );
        for _ in 0..3 {
            call(&breaker, CallOutcome::Failure);
        }
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(breaker.counts(), CircuitCounts::default());

        call(&breaker, CallOutcome::Failure);
        assert_eq!(breaker.state(), CircuitBreakerState::Closed);
    }

    #[test]
    fn test_open_to_half_open_transition() {
        let breaker = CircuitBreaker::new("test", config());
        trip(&breaker);

        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(breaker.state(), CircuitBreakerState::HalfOpen);
        assert!(breaker.try_acquire().is_some());
    }

    #[test]
    fn test_half_open_to_closed_on_success() {
        let breaker = CircuitBreaker::new("test", config());
        trip(&breaker);
        std::thread::sleep(Duration::from_millis(20));

        call(&breaker, CallOutcome::Success);
        assert_eq!(breaker.state(), CircuitBreakerState::HalfOpen);
        call(&breaker, CallOutcome::Success);

        assert_eq!(breaker.state(), CircuitBreakerState::Closed);
        assert_eq!(breaker.counts(), CircuitCounts::default());
    }

    #[test]
    fn test_half_open_to_open_on_failure() {
        let breaker = CircuitBreaker::new("test", config());
        trip(&breaker);
        std::thread::sleep(Duration::from_millis(20));

        call(&breaker, CallOutcome::Success);
        call(&breaker, CallOutcome::Failure);

        assert_eq!(breaker.state(), CircuitBreakerState::Open);
    }

    #[test]
    fn test_half_open_permits_limited_calls() {
        let breaker = CircuitBreaker::new("test", config());
        trip(&breaker);
        std::thread::sleep(Duration::from_millis(20));

        let first = breaker.try_acquire().expect("first trial");
        let second = breaker.try_acquire().expect("second trial");
        assert!(breaker.try_acquire().is_none());

        first.record(CallOutcome::Success);
        second.record(CallOutcome::Success);
        assert_eq!(breaker.state(), CircuitBreakerState::Closed);
    }

    #[test]
    fn test_neutral_half_open_trial_releases_slot() {
        let breaker = CircuitBreaker::new("test", config());
        trip(&breaker);
        std::thread::sleep(Duration::from_millis(20));

        let first = breaker.try_acquire().expect("first trial");
        let second = breaker.try_acquire().expect("second trial");
        assert!(breaker.try_acquire().is_none());

        first.record(CallOutcome::Neutral);
        assert!(breaker.try_acquire().is_some());
        drop(second);
        assert_eq!(breaker.state(), CircuitBreakerState::HalfOpen);
    }

    #[test]
    fn test_dropped_permit_is_neutral() {
        let breaker = CircuitBreaker::new("test", config());
        {
            let _permit = breaker.try_acquire();
        }
        assert_eq!(breaker.counts().requests, 0);
    }

    #[test]
    fn test_stale_outcome_is_ignored() {
        let breaker = CircuitBreaker::new("test", config());
        let stale = breaker.try_acquire().expect("permitted");
        breaker.force_open();
        breaker.force_close();

        stale.record(CallOutcome::Failure);
        assert_eq!(breaker.counts(), CircuitCounts::default());
    }

    #[test]
    fn test_force_open_and_close() {
        let breaker = CircuitBreaker::new("test", config());

        breaker.force_open();
        assert_eq!(breaker.state(), CircuitBreakerState::Open);

        breaker.force_close();
        assert_eq!(breaker.state(), CircuitBreakerState::Closed);
    }

    #[test]
    fn test_concurrent_callers() {
        let breaker = std::sync::Arc::new(CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                minimum_requests: 1000,
                ..config()
            },
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let breaker = std::sync::Arc::clone(&breaker);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        if let Some(permit) = breaker.try_acquire() {
                            permit.record(CallOutcome::Success);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let counts = breaker.counts();
        assert_eq!(counts.requests, 800);
        assert_eq!(counts.successes, 800);
    }
}
