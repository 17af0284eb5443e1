//! Compass heading records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A compass reading: heading in degrees relative to true north.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compass {
    /// Time the reading was taken.
    pub timestamp: Option<Timestamp>,

    /// Heading in degrees, true-north referenced.
    pub heading: Option<f64>,
}

impl Compass {
    /// Returns `true` if the heading is present.
    #[must_use]
    pub const fn has_heading(&self) -> bool {
        self.heading.is_some()
    }
}
