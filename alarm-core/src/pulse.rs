//! # Pulse
//! Square wave with a fixed period and on-time, sampled by polling.

use crate::time::Millis;

/// A blinker for the alarm LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    /// Length of one on/off cycle in milliseconds
    period: u32,
    /// High time within one cycle in milliseconds
    on_time: u32,
    /// Phase origin: the pulse is high right at this instant
    origin: Millis,
}

impl Pulse {
    /// Create a pulse of `period` ms that is high for the first `on_time` ms of each period
    pub const fn new(period: u32, on_time: u32) -> Self {
        Self {
            period,
            on_time,
            origin: Millis::ZERO,
        }
    }

    /// Start a fresh period at `now`
    pub const fn restart(&mut self, now: Millis) {
        self.origin = now;
    }

    /// Level of the pulse at `now`
    pub const fn is_high(&self, now: Millis) -> bool {
        if self.period == 0 {
            return false;
        }
        now.elapsed_since(self.origin) % self.period < self.on_time
    }
}
