//! GPS sensor records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A single GPS reading from the capture device.
///
/// Every payload field is optional: a decoded row leaves a field unset when
/// the source column is empty, and "absent" is distinct from zero.
///
/// # Example
///
/// ```
/// use trip_types::{GpsRecord, Timestamp};
///
/// let mut gps = GpsRecord::default();
/// gps.timestamp = Some(Timestamp::from_secs_f64(100.5));
/// gps.latitude = Some(45.0);
/// gps.longitude = Some(10.0);
///
/// assert!(gps.has_fix());
/// assert!(gps.altitude.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsRecord {
    /// Time the reading was taken.
    pub timestamp: Option<Timestamp>,

    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,

    /// Altitude in meters; negative below sea level.
    pub altitude: Option<f64>,

    /// Horizontal accuracy in meters.
    pub horizontal_accuracy: Option<f64>,

    /// Vertical accuracy in meters.
    pub vertical_accuracy: Option<f64>,

    /// Ground speed in m/s.
    pub speed: Option<f64>,
}

impl GpsRecord {
    /// Returns `true` if latitude and longitude are both present.
    #[must_use]
    pub const fn has_fix(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Returns `true` if no field of the reading is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.timestamp.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.altitude.is_none()
            && self.horizontal_accuracy.is_none()
            && self.vertical_accuracy.is_none()
            && self.speed.is_none()
    }

    /// Ground speed converted to km/h, if present.
    #[must_use]
    pub fn speed_kmh(&self) -> Option<f64> {
        self.speed.map(crate::units::mps_to_kmh)
    }

    /// Identity comparison: timestamp plus coordinates.
    ///
    /// Two readings with the same timestamp and position are the same
    /// logical fix even if accuracy fields differ.
    #[must_use]
    pub fn same_fix(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
            && self.latitude == other.latitude
            && self.longitude == other.longitude
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let gps = GpsRecord::default();
        assert!(gps.is_empty());
        assert!(!gps.has_fix());
    }

    #[test]
    fn has_fix_requires_both_coordinates() {
        let mut gps = GpsRecord::default();
        gps.latitude = Some(45.0);
        assert!(!gps.has_fix());
        gps.longitude = Some(10.0);
        assert!(gps.has_fix());
    }

    #[test]
    fn speed_kmh_converts() {
        let mut gps = GpsRecord::default();
        assert!(gps.speed_kmh().is_none());
        gps.speed = Some(10.0);
        assert!((gps.speed_kmh().unwrap() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn same_fix_ignores_accuracy() {
        let mut a = GpsRecord::default();
        a.timestamp = Some(Timestamp::from_secs_f64(1.0));
        a.latitude = Some(45.0);
        a.longitude = Some(10.0);
        a.horizontal_accuracy = Some(5.0);

        let mut b = a.clone();
        b.horizontal_accuracy = Some(20.0);

        assert!(a.same_fix(&b));
        assert_ne!(a, b);
    }
}
