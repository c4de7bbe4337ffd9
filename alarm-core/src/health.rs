//! # Task health
//! Liveness bookkeeping for the tasks that gate the hardware watchdog.
//!
//! A task counts as stale when it reported a failure, or when its last success is older
//! than its report interval. A task that never reported is still starting up and is not
//! judged. Only critical tasks can hold back the watchdog; the others are reported but
//! the board keeps running without them.

use crate::time::Millis;

/// Health of one periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskHealth {
    /// Longest allowed gap between successes, in milliseconds
    max_report_interval: u32,
    /// Whether a stale task should stop the watchdog feed
    critical: bool,
    /// Time of the last success
    last_success: Option<Millis>,
    /// The last report was a failure
    failed: bool,
}

impl TaskHealth {
    /// A task that has not reported yet
    pub const fn new(max_report_interval: u32, critical: bool) -> Self {
        Self {
            max_report_interval,
            critical,
            last_success: None,
            failed: false,
        }
    }

    /// Record a successful iteration at `now`
    pub fn report_success(&mut self, now: Millis) {
        self.last_success = Some(now);
        self.failed = false;
    }

    /// Record a failed iteration; the task is stale until it succeeds again
    pub fn report_failure(&mut self, now: Millis) {
        self.last_success.get_or_insert(now);
        self.failed = true;
    }

    /// Whether the task failed or went quiet for too long
    pub fn is_stale(&self, now: Millis) -> bool {
        self.last_success.is_some_and(|last| {
            self.failed || now.elapsed_since(last) >= self.max_report_interval
        })
    }

    /// Whether this task keeps the watchdog from being fed at `now`
    pub fn blocks_feed(&self, now: Millis) -> bool {
        self.critical && self.is_stale(now)
    }

    /// Whether a stale task stops the watchdog feed
    pub const fn is_critical(&self) -> bool {
        self.critical
    }
}
