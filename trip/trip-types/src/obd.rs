//! On-board diagnostics records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A vehicle speed reading from the on-board diagnostics port, in km/h.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obd {
    /// Time the reading was taken.
    pub timestamp: Option<Timestamp>,

    /// Vehicle speed in km/h.
    pub speed: Option<f64>,
}

impl Obd {
    /// Returns `true` if the speed is present.
    #[must_use]
    pub const fn has_speed(&self) -> bool {
        self.speed.is_some()
    }
}
