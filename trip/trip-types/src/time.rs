//! Time types for sensor records.
//!
//! Capture devices log time as seconds with sub-millisecond precision.

use core::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timestamp of a sensor record, in seconds.
///
/// Timestamps are monotonically non-decreasing within one well-formed log
/// stream, but malformed logs may interleave out-of-order rows; consumers
/// sort with [`Timestamp::total_cmp`] rather than assuming order.
///
/// # Example
///
/// ```
/// use trip_types::Timestamp;
///
/// let ts = Timestamp::from_secs_f64(1471117570.183);
/// assert!((ts.as_secs_f64() - 1471117570.183).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp(f64);

impl Timestamp {
    /// Creates a timestamp from seconds.
    #[must_use]
    pub const fn from_secs_f64(secs: f64) -> Self {
        Self(secs)
    }

    /// Returns the timestamp as seconds.
    #[must_use]
    pub const fn as_secs_f64(self) -> f64 {
        self.0
    }

    /// Returns the zero timestamp.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Checks if this is the zero timestamp.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Total ordering over timestamps, usable as a sort key.
    ///
    /// Delegates to [`f64::total_cmp`], so NaN values (which only appear in
    /// hand-built records, never from the decoder) sort deterministically.
    #[must_use]
    pub fn total_cmp(self, other: Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }

    /// Seconds elapsed between `self` and an earlier timestamp.
    #[must_use]
    pub fn secs_since(self, earlier: Self) -> f64 {
        self.0 - earlier.0
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for Timestamp {
    fn from(secs: f64) -> Self {
        Self(secs)
    }
}
