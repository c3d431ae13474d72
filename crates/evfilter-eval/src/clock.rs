//! Logical clock
//!
//! The engine's "now" is a millisecond scalar decoupled from wall-clock time. It only
//! moves when a time-advance signal is applied. Reads are a single atomic load.

use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Policy for a time-advance signal earlier than the current time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockPolicy {
    /// Fail with a clock regression fault and leave the clock unchanged
    #[default]
    Reject,
    /// Keep the current time and log a warning
    Clamp,
}

/// Signal moving the logical clock to `target` epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeAdvance {
    pub target: i64,
}

impl TimeAdvance {
    pub const fn to(target: i64) -> Self {
        Self { target }
    }
}

/// Process-wide logical clock.
#[derive(Debug)]
pub struct LogicalClock {
    current: AtomicI64,
    policy: ClockPolicy,
}

impl Default for LogicalClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl LogicalClock {
    /// Clock starting at `start` that rejects regressions
    pub fn new(start: i64) -> Self {
        Self::with_policy(start, ClockPolicy::Reject)
    }

    pub fn with_policy(start: i64, policy: ClockPolicy) -> Self {
        Self {
            current: AtomicI64::new(start),
            policy,
        }
    }

    pub fn policy(&self) -> ClockPolicy {
        self.policy
    }

    /// Current logical time in epoch milliseconds
    pub fn now(&self) -> i64 {
        self.current.load(Ordering::Acquire)
    }

    /// Move the clock to `target` and return the resulting time.
    ///
    /// Advancing to the current time is a no-op. A regression is rejected or clamped
    /// according to the clock's policy.
    pub fn advance(&self, target: i64) -> EvalResult<i64> {
        let result = self
            .current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (target >= current).then_some(target)
            });
        match result {
            Ok(previous) => {
                log::debug!("Logical clock advanced from {} to {}", previous, target);
                Ok(target)
            }
            Err(current) => match self.policy {
                ClockPolicy::Reject => Err(EvalError::ClockRegression {
                    current,
                    requested: target,
                }),
                ClockPolicy::Clamp => {
                    log::warn!(
                        "Ignoring time advance to {} behind current logical time {}",
                        target,
                        current
                    );
                    Ok(current)
                }
            },
        }
    }

    /// Apply a time-advance signal
    pub fn apply(&self, signal: &TimeAdvance) -> EvalResult<i64> {
        self.advance(signal.target)
    }
}
