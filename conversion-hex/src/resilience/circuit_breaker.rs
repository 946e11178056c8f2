//! Count-based circuit breaker.
//!
//! ```text
//!            failure rate >= threshold
//!   CLOSED ──────────────────────────────▶ OPEN
//!     ▲                                     │
//!     │ N trial successes                   │ open_duration elapsed
//!     │                                     ▼
//!     └──────────────────────────────── HALF_OPEN
//!                  any trial failure ──▶ OPEN
//! ```
//!
//! Every state change bumps an epoch. Outcomes carried by permits issued in
//! an earlier epoch are ignored, so a slow call that started while CLOSED
//! cannot corrupt the statistics of a later phase.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

use conversion_types::{ConfigError, ResilienceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => f.write_str("CLOSED"),
            CircuitState::Open => f.write_str("OPEN"),
            CircuitState::HalfOpen => f.write_str("HALF_OPEN"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Percentage (0, 100] of failed calls in the window that opens the circuit.
    pub failure_rate_threshold: f32,
    /// Number of most recent outcomes retained while CLOSED.
    pub sliding_window_size: usize,
    /// Outcomes required before the failure rate is evaluated.
    pub minimum_calls: usize,
    /// Time spent OPEN before trial calls are admitted.
    pub open_duration: Duration,
    /// Trial calls admitted in HALF_OPEN; all must succeed to close.
    pub half_open_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_rate_threshold: 50.0,
            sliding_window_size: 20,
            minimum_calls: 10,
            open_duration: Duration::from_secs(60),
            half_open_calls: 1,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.failure_rate_threshold > 0.0 && self.failure_rate_threshold <= 100.0) {
            return Err(ConfigError::invalid(
                "circuit_breaker.failure_rate_threshold",
                format!("must be in (0, 100], got {}", self.failure_rate_threshold),
            ));
        }
        if self.sliding_window_size == 0 {
            return Err(ConfigError::invalid(
                "circuit_breaker.sliding_window_size",
                "must be at least 1",
            ));
        }
        if self.minimum_calls == 0 {
            return Err(ConfigError::invalid(
                "circuit_breaker.minimum_calls",
                "must be at least 1",
            ));
        }
        if self.half_open_calls == 0 {
            return Err(ConfigError::invalid(
                "circuit_breaker.half_open_calls",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Point-in-time view of the breaker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitBreakerMetrics {
    pub state: CircuitState,
    pub buffered_calls: usize,
    pub failed_calls: usize,
    /// `None` until `minimum_calls` outcomes are buffered.
    pub failure_rate: Option<f32>,
    pub not_permitted_calls: u64,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    epoch: u64,
    /// `true` = failure. Only populated while CLOSED.
    window: VecDeque<bool>,
    failures: usize,
    opened_at: Option<Instant>,
    trials_in_flight: u32,
    trial_successes: u32,
    not_permitted: u64,
}

impl Inner {
    fn failure_rate(&self) -> f32 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.failures as f32 * 100.0 / self.window.len() as f32
    }

    fn push(&mut self, failed: bool, capacity: usize) {
        if self.window.len() == capacity {
            if let Some(true) = self.window.pop_front() {
                self.failures -= 1;
            }
        }
        self.window.push_back(failed);
        if failed {
            self.failures += 1;
        }
    }

    fn transition(&mut self, to: CircuitState) {
        let from = self.state;
        self.state = to;
        self.epoch += 1;
        self.window.clear();
        self.failures = 0;
        self.trials_in_flight = 0;
        self.trial_successes = 0;
        self.opened_at = (to == CircuitState::Open).then(Instant::now);
        tracing::info!(%from, %to, "Circuit breaker state transition");
    }
}

pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                epoch: 0,
                window: VecDeque::with_capacity(config.sliding_window_size),
                failures: 0,
                opened_at: None,
                trials_in_flight: 0,
                trial_successes: 0,
                not_permitted: 0,
            }),
            config,
        })
    }

    /// Asks to make one call.
    ///
    /// OPEN rejects until `open_duration` has elapsed, then moves to
    /// HALF_OPEN. HALF_OPEN admits at most `half_open_calls` trials.
    pub fn try_acquire(&self) -> Result<CallPermit<'_>, ResilienceError> {
        let mut inner = self.inner.lock();

        if inner.state == CircuitState::Open {
            let waited = inner
                .opened_at
                .is_none_or(|at| at.elapsed() >= self.config.open_duration);
            if waited {
                inner.transition(CircuitState::HalfOpen);
            }
        }

        let state = inner.state;
        match state {
            CircuitState::Closed => Ok(CallPermit::new(self, inner.epoch, false)),
            CircuitState::HalfOpen
                if inner.trials_in_flight + inner.trial_successes < self.config.half_open_calls =>
            {
                inner.trials_in_flight += 1;
                Ok(CallPermit::new(self, inner.epoch, true))
            }
            CircuitState::Open | CircuitState::HalfOpen => {
                inner.not_permitted += 1;
                Err(ResilienceError::CircuitOpen)
            }
        }
    }

    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    pub fn metrics(&self) -> CircuitBreakerMetrics {
        let inner = self.inner.lock();
        let buffered_calls = inner.window.len();
        let required = self.config.minimum_calls.min(self.config.sliding_window_size);
        CircuitBreakerMetrics {
            state: inner.state,
            buffered_calls,
            failed_calls: inner.failures,
            failure_rate: (buffered_calls >= required).then(|| inner.failure_rate()),
            not_permitted_calls: inner.not_permitted,
        }
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    fn on_outcome(&self, epoch: u64, trial: bool, failed: bool) {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            return;
        }

        let state = inner.state;
        match state {
            CircuitState::Closed => {
                inner.push(failed, self.config.sliding_window_size);
                let required = self.config.minimum_calls.min(self.config.sliding_window_size);
                if inner.window.len() >= required
                    && inner.failure_rate() >= self.config.failure_rate_threshold
                {
                    tracing::warn!(
                        failure_rate = inner.failure_rate(),
                        buffered_calls = inner.window.len(),
                        "Failure rate threshold reached"
                    );
                    inner.transition(CircuitState::Open);
                }
            }
            CircuitState::HalfOpen if trial => {
                inner.trials_in_flight = inner.trials_in_flight.saturating_sub(1);
                if failed {
                    inner.transition(CircuitState::Open);
                } else {
                    inner.trial_successes += 1;
                    if inner.trial_successes >= self.config.half_open_calls {
                        inner.transition(CircuitState::Closed);
                    }
                }
            }
            _ => {}
        }
    }

    fn release_trial(&self, epoch: u64) {
        let mut inner = self.inner.lock();
        if inner.epoch == epoch && inner.state == CircuitState::HalfOpen {
            inner.trials_in_flight = inner.trials_in_flight.saturating_sub(1);
        }
    }
}

/// Admission to make one call; consume it with the call's outcome.
///
/// Dropping it unsettled (e.g. the caller was cancelled) records nothing and
/// frees the trial slot it may hold.
#[must_use = "record the call outcome on the permit"]
pub struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    epoch: u64,
    trial: bool,
    settled: bool,
}

impl<'a> CallPermit<'a> {
    fn new(breaker: &'a CircuitBreaker, epoch: u64, trial: bool) -> Self {
        Self {
            breaker,
            epoch,
            trial,
            settled: false,
        }
    }

    pub fn record_success(mut self) {
        self.settled = true;
        self.breaker.on_outcome(self.epoch, self.trial, false);
    }

    pub fn record_failure(mut self) {
        self.settled = true;
        self.breaker.on_outcome(self.epoch, self.trial, true);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.settled && self.trial {
            self.breaker.release_trial(self.epoch);
        }
    }
}
