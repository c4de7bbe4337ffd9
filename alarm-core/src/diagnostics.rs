//! Counters of rejected requests, for the system info screen and the debug log.

use crate::error::Error;

/// How often each kind of misuse was absorbed since boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    /// Observations repeating a cycle already counted
    pub repeated_sequences: u32,
    /// Observations from a cycle older than the newest one seen
    pub stale_sequences: u32,
    /// Unconfirmed-change requests with a key that has no alarm slot
    pub unmapped_keys: u32,
    /// Update ticks where the active level had no notes to play
    pub silent_tones: u32,
}

impl Diagnostics {
    /// Count one occurrence of `error`
    pub fn record(&mut self, error: &Error) {
        let counter = match error {
            Error::RepeatedSequence { .. } => &mut self.repeated_sequences,
            Error::StaleSequence { .. } => &mut self.stale_sequences,
            Error::UnmappedKey(_) => &mut self.unmapped_keys,
            Error::EmptyTone => &mut self.silent_tones,
        };
        *counter = counter.saturating_add(1);
    }

    /// Sum over all counters
    pub const fn total(&self) -> u32 {
        self.repeated_sequences
            .saturating_add(self.stale_sequences)
            .saturating_add(self.unmapped_keys)
            .saturating_add(self.silent_tones)
    }
}
