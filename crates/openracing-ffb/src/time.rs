//! Wrap-safe millisecond timestamps.

use serde::{Deserialize, Serialize};

/// Monotonic millisecond timestamp that wraps at `u32::MAX`.
///
/// Ordering is defined through modular subtraction, so comparisons stay
/// correct across a wrap as long as the two instants are less than
/// `i32::MAX` milliseconds apart.
///
/// ```
/// use openracing_ffb::Timestamp;
///
/// let before_wrap = Timestamp::from_millis(u32::MAX - 1);
/// let after_wrap = before_wrap.wrapping_add_ms(5);
/// assert!(after_wrap.is_at_or_after(before_wrap));
/// assert_eq!(after_wrap.since(before_wrap), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u32);

impl Timestamp {
    /// The zero instant.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from a raw millisecond count.
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    /// Raw millisecond count.
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Adds `ms` milliseconds, wrapping on overflow.
    #[must_use]
    pub const fn wrapping_add_ms(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }

    /// Milliseconds elapsed from `earlier` to `self`.
    pub const fn since(self, earlier: Timestamp) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// `self >= other` under modular ordering.
    pub const fn is_at_or_after(self, other: Timestamp) -> bool {
        (self.0.wrapping_sub(other.0) as i32) >= 0
    }

    /// `self < other` under modular ordering.
    pub const fn is_before(self, other: Timestamp) -> bool {
        !self.is_at_or_after(other)
    }
}

impl From<u32> for Timestamp {
    fn from(ms: u32) -> Self {
        Self(ms)
    }
}
