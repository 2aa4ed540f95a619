//! # Exponential Backoff
//!
//! Per-resource retry delays for failed reconciliations.
//!
//! The delay doubles on every consecutive failure, starting at `start` and
//! capped at `max`. A successful reconcile resets the sequence.
//!
//! ## Usage
//!
//! ```rust
//! use zpa_provider::controller::backoff::ExponentialBackoff;
//!
//! let mut backoff = ExponentialBackoff::new(5, 60);
//! assert_eq!(backoff.next_backoff_seconds(), 5);
//! assert_eq!(backoff.next_backoff_seconds(), 10);
//! assert_eq!(backoff.next_backoff_seconds(), 20);
//! assert_eq!(backoff.next_backoff_seconds(), 40);
//! assert_eq!(backoff.next_backoff_seconds(), 60);
//! ```

use std::time::Duration;

/// Doubling backoff calculator, in seconds
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    start_secs: u64,
    current_secs: u64,
    max_secs: u64,
}

impl ExponentialBackoff {
    /// Create a backoff starting at `start_secs` and capped at `max_secs`.
    ///
    /// A zero start is raised to one second so the sequence can grow.
    #[must_use]
    pub fn new(start_secs: u64, max_secs: u64) -> Self {
        let start_secs = start_secs.max(1);
        Self {
            start_secs,
            current_secs: start_secs,
            max_secs: max_secs.max(start_secs),
        }
    }

    /// Current delay in seconds; advances the sequence
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result = self.current_secs;
        self.current_secs = self.current_secs.saturating_mul(2).min(self.max_secs);
        result
    }

    #[must_use]
    pub fn next_backoff(&mut self) -> Duration {
        Duration::from_secs(self.next_backoff_seconds())
    }

    pub fn reset(&mut self) {
        self.current_secs = self.start_secs;
    }
}
