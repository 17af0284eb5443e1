//! Barometric pressure records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A barometric pressure reading, in kPa.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pressure {
    /// Time the reading was taken.
    pub timestamp: Option<Timestamp>,

    /// Pressure in kPa.
    pub pressure: Option<f64>,
}

impl Pressure {
    /// Returns `true` if the pressure is present.
    #[must_use]
    pub const fn has_pressure(&self) -> bool {
        self.pressure.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_pressure() {
        assert!(!Pressure::default().has_pressure());
    }

    #[test]
    fn pressure_present() {
        let pressure = Pressure {
            pressure: Some(101.3),
            ..Pressure::default()
        };
        assert!(pressure.has_pressure());
    }
}
