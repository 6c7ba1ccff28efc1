//! Retry state machine with exponential backoff
//!
//! `Attempting(n)` moves to `Succeeded`, `Retrying(n + 1)` (after sleeping
//! `backoff_delay(n, base)`), or `Failed` once `n + 1 == max_attempts`.

use std::time::Duration;

/// Exponent cap so the shift never overflows on absurd retry counts
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Delay after failed attempt `attempt` (0-based): `2^attempt * base`
#[must_use]
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(1u32 << attempt.min(MAX_BACKOFF_EXPONENT))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    /// Attempt `n` (0-based) is in flight
    Attempting(u32),
    /// Waiting out the backoff before attempt `n`
    Retrying { next: u32, delay: Duration },
    Succeeded,
    /// All attempts used; carries the last error message
    Failed(String),
}

impl AttemptState {
    /// Start state for a fresh URL
    #[must_use]
    pub fn start() -> Self {
        Self::Attempting(0)
    }

    /// Transition after attempt `attempt` failed with `error`
    #[must_use]
    pub fn after_failure(attempt: u32, max_attempts: u32, base: Duration, error: String) -> Self {
        if attempt + 1 < max_attempts {
            Self::Retrying {
                next: attempt + 1,
                delay: backoff_delay(attempt, base),
            }
        } else {
            Self::Failed(error)
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}
