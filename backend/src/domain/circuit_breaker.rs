//! Circuit breaker guarding calls to an unreliable dependency.
//!
//! States move `Closed -> Open -> HalfOpen -> Closed`:
//! - Closed admits every call and trips once consecutive failures exceed the
//!   threshold. The failure count is cleared every `closed_reset_interval`.
//! - Open rejects calls until `open_cooldown` has elapsed.
//! - HalfOpen admits at most `half_open_max_probes` calls. Any probe failure
//!   reopens the breaker; enough probe successes close it.
//!
//! The breaker is shared by every request in the process. All transitions
//! happen under one mutex, and results are tagged with the generation in which
//! the call was admitted so outcomes from a previous state cannot corrupt the
//! current one.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};

/// Circuit breaker tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// The breaker trips when consecutive failures exceed this count.
    pub failure_threshold: u32,
    /// Time spent open before probes are allowed.
    pub open_cooldown: Duration,
    /// Calls admitted while half-open.
    pub half_open_max_probes: u32,
    /// Probe successes needed to close again.
    pub half_open_successes_to_close: u32,
    /// Period after which the closed-state failure count is cleared.
    pub closed_reset_interval: Option<Duration>,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            open_cooldown: Duration::from_secs(20),
            half_open_max_probes: 5,
            half_open_successes_to_close: 1,
            closed_reset_interval: Some(Duration::from_secs(10)),
        }
    }
}

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls flow normally.
    Closed,
    /// Calls are rejected without reaching the dependency.
    Open,
    /// A limited number of probe calls are allowed through.
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        })
    }
}

/// The breaker refused to admit a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("circuit breaker is open")]
pub struct CircuitOpen;

/// Proof of admission for one call.
///
/// Report the outcome with [`BreakerTicket::record_success`] or
/// [`BreakerTicket::record_failure`]. A ticket dropped without an outcome,
/// such as when the calling future is cancelled, hands its half-open probe
/// slot back so the breaker can still recover.
#[must_use = "report the call outcome with record_success or record_failure"]
pub struct BreakerTicket<'a> {
    breaker: &'a CircuitBreaker,
    generation: u64,
    settled: bool,
}

impl BreakerTicket<'_> {
    fn refused(mut self) -> CircuitOpen {
        self.settled = true;
        CircuitOpen
    }

    /// Report a successful call.
    pub fn record_success(mut self) {
        self.settled = true;
        self.breaker.on_success(self.generation);
    }

    /// Report a failed call.
    pub fn record_failure(mut self) {
        self.settled = true;
        self.breaker.on_failure(self.generation);
    }
}

impl fmt::Debug for BreakerTicket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakerTicket")
            .field("breaker", &self.breaker.name)
            .field("generation", &self.generation)
            .field("settled", &self.settled)
            .finish()
    }
}

impl Drop for BreakerTicket<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_abandoned(self.generation);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InternalState {
    Closed {
        consecutive_failures: u32,
        window_started_at: DateTime<Utc>,
    },
    Open {
        opened_at: DateTime<Utc>,
    },
    HalfOpen {
        admitted: u32,
        successes: u32,
    },
}

impl InternalState {
    fn closed(now: DateTime<Utc>) -> Self {
        Self::Closed {
            consecutive_failures: 0,
            window_started_at: now,
        }
    }

    fn public(self) -> CircuitState {
        match self {
            Self::Closed { .. } => CircuitState::Closed,
            Self::Open { .. } => CircuitState::Open,
            Self::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }
}

#[derive(Debug)]
struct BreakerCore {
    state: InternalState,
    generation: u64,
}

/// Process-wide circuit breaker.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use favorites::domain::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
///
/// let breaker = CircuitBreaker::new(
///     "identity",
///     CircuitBreakerConfig::default(),
///     Arc::new(mockable::DefaultClock),
/// );
/// let ticket = breaker.admit().expect("closed breakers admit calls");
/// ticket.record_success();
/// assert_eq!(breaker.state(), CircuitState::Closed);
/// ```
pub struct CircuitBreaker {
    name: &'static str,
    config: CircuitBreakerConfig,
    clock: Arc<dyn Clock>,
    core: Mutex<BreakerCore>,
}

impl CircuitBreaker {
    /// Build a closed breaker. `name` labels transition logs.
    pub fn new(name: &'static str, config: CircuitBreakerConfig, clock: Arc<dyn Clock>) -> Self {
        let now = clock.utc();
        Self {
            name,
            config: CircuitBreakerConfig {
                half_open_max_probes: config.half_open_max_probes.max(1),
                half_open_successes_to_close: config.half_open_successes_to_close.max(1),
                ..config
            },
            clock,
            core: Mutex::new(BreakerCore {
                state: InternalState::closed(now),
                generation: 0,
            }),
        }
    }

    /// Ask to place one call.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitOpen`] while open, or while half-open with every probe
    /// slot taken.
    pub fn admit(&self) -> Result<BreakerTicket<'_>, CircuitOpen> {
        let now = self.clock.utc();
        let mut core = self.lock();
        self.refresh(&mut core, now);

        let ticket = BreakerTicket {
            breaker: self,
            generation: core.generation,
            settled: false,
        };
        // Refused tickets are settled before the lock is released; dropping an
        // unsettled one here would re-enter the mutex.
        match core.state {
            InternalState::Closed { .. } => Ok(ticket),
            InternalState::Open { .. } => Err(ticket.refused()),
            InternalState::HalfOpen {
                admitted,
                successes,
            } if admitted < self.config.half_open_max_probes => {
                core.state = InternalState::HalfOpen {
                    admitted: admitted.saturating_add(1),
                    successes,
                };
                Ok(ticket)
            }
            InternalState::HalfOpen { .. } => Err(ticket.refused()),
        }
    }

    fn on_success(&self, generation: u64) {
        let now = self.clock.utc();
        let mut core = self.lock();
        self.refresh(&mut core, now);
        if generation != core.generation {
            return;
        }

        match core.state {
            InternalState::Closed {
                window_started_at, ..
            } => {
                core.state = InternalState::Closed {
                    consecutive_failures: 0,
                    window_started_at,
                };
            }
            InternalState::HalfOpen {
                admitted,
                successes,
            } => {
                let successes = successes.saturating_add(1);
                if successes >= self.config.half_open_successes_to_close {
                    self.transition(&mut core, InternalState::closed(now));
                } else {
                    core.state = InternalState::HalfOpen {
                        admitted,
                        successes,
                    };
                }
            }
            InternalState::Open { .. } => {}
        }
    }

    fn on_failure(&self, generation: u64) {
        let now = self.clock.utc();
        let mut core = self.lock();
        self.refresh(&mut core, now);
        if generation != core.generation {
            return;
        }

        match core.state {
            InternalState::Closed {
                consecutive_failures,
                window_started_at,
            } => {
                let consecutive_failures = consecutive_failures.saturating_add(1);
                if consecutive_failures > self.config.failure_threshold {
                    self.transition(&mut core, InternalState::Open { opened_at: now });
                } else {
                    core.state = InternalState::Closed {
                        consecutive_failures,
                        window_started_at,
                    };
                }
            }
            InternalState::HalfOpen { .. } => {
                self.transition(&mut core, InternalState::Open { opened_at: now });
            }
            InternalState::Open { .. } => {}
        }
    }

    fn on_abandoned(&self, generation: u64) {
        let now = self.clock.utc();
        let mut core = self.lock();
        self.refresh(&mut core, now);
        if generation != core.generation {
            return;
        }

        if let InternalState::HalfOpen {
            admitted,
            successes,
        } = core.state
        {
            core.state = InternalState::HalfOpen {
                admitted: admitted.saturating_sub(1),
                successes,
            };
            debug!(breaker = self.name, "abandoned probe released its slot");
        }
    }

    /// Current state, after applying any elapsed timers.
    pub fn state(&self) -> CircuitState {
        let now = self.clock.utc();
        let mut core = self.lock();
        self.refresh(&mut core, now);
        core.state.public()
    }

    fn lock(&self) -> MutexGuard<'_, BreakerCore> {
        // The core holds plain values, so a panic elsewhere cannot leave it
        // half-written.
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh(&self, core: &mut BreakerCore, now: DateTime<Utc>) {
        match core.state {
            InternalState::Closed {
                window_started_at, ..
            } => {
                if let Some(interval) = self.config.closed_reset_interval {
                    if has_elapsed(window_started_at, now, interval) {
                        core.state = InternalState::closed(now);
                        core.generation = core.generation.wrapping_add(1);
                    }
                }
            }
            InternalState::Open { opened_at }
                if has_elapsed(opened_at, now, self.config.open_cooldown) =>
            {
                self.transition(
                    core,
                    InternalState::HalfOpen {
                        admitted: 0,
                        successes: 0,
                    },
                );
            }
            InternalState::Open { .. } | InternalState::HalfOpen { .. } => {}
        }
    }

    fn transition(&self, core: &mut BreakerCore, next: InternalState) {
        let from = core.state.public();
        let to = next.public();
        core.state = next;
        core.generation = core.generation.wrapping_add(1);

        if to == CircuitState::Open {
            warn!(breaker = self.name, %from, %to, "circuit breaker state changed");
        } else {
            info!(breaker = self.name, %from, %to, "circuit breaker state changed");
        }
    }
}

fn has_elapsed(since: DateTime<Utc>, now: DateTime<Utc>, period: Duration) -> bool {
    // An unrepresentable period is treated as already elapsed so the breaker
    // can never stay stuck.
    let Ok(period) = chrono::Duration::from_std(period) else {
        return true;
    };
    since
        .checked_add_signed(period)
        .is_none_or(|expires_at| now >= expires_at)
}
