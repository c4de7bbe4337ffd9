//! # Time
//! Millisecond timestamps from a free-running 32-bit counter.
//!
//! The counter wraps after about 49.7 days of uptime, so timestamps are never compared
//! directly. Every comparison goes through wrapping subtraction, which stays correct as long
//! as the two timestamps are less than half the counter range apart.

/// Half of the `u32` range; differences at or above this are read as "in the past"
const HALF_RANGE: u32 = 1 << 31;

/// Milliseconds since boot, wrapping at `u32::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(u32);

impl Millis {
    /// The boot instant
    pub const ZERO: Self = Self(0);

    /// Create a timestamp from a raw millisecond count
    pub const fn new(ms: u32) -> Self {
        Self(ms)
    }

    /// The raw millisecond count
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, correct across a wraparound
    pub const fn elapsed_since(self, earlier: Self) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// The timestamp `ms` milliseconds after `self`, wrapping
    #[must_use]
    pub const fn wrapping_add(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }

    /// Whether `self` is at or past `deadline`
    pub const fn has_reached(self, deadline: Self) -> bool {
        self.0.wrapping_sub(deadline.0) < HALF_RANGE
    }
}

impl From<u32> for Millis {
    fn from(ms: u32) -> Self {
        Self(ms)
    }
}

/// Whether sequence number `a` comes strictly after `b`, with the same wrapping rule as [`Millis`]
pub(crate) const fn seq_is_after(a: u32, b: u32) -> bool {
    let diff = a.wrapping_sub(b);
    diff != 0 && diff < HALF_RANGE
}
