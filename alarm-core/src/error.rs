//! Logic misuse the alarm core detects and absorbs.
//!
//! None of these ever stop alarm processing. [`crate::AlarmManager`] turns each one into a
//! no-op, counts it in [`crate::Diagnostics`] and logs it.

use crate::display::DisplayKey;

/// Rejected request
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The same cycle already reported this outcome
    #[error("cycle {seq} already counted for this outcome")]
    RepeatedSequence {
        /// The repeated cycle sequence number
        seq: u32,
    },

    /// The cycle is older than the newest observation of the alarm
    #[error("cycle {seq} is older than the last observation")]
    StaleSequence {
        /// The out-of-order cycle sequence number
        seq: u32,
    },

    /// The display key has no "setting not confirmed" slot
    #[error("display key {0:?} has no confirmation alarm")]
    UnmappedKey(DisplayKey),

    /// A tone with no notes was asked to play
    #[error("tone has no notes")]
    EmptyTone,
}
