//! Motion sensor records: attitude, acceleration, gravity and the fused
//! device-motion reading.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Device orientation as yaw/pitch/roll, in radians.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attitude {
    /// Time the reading was taken.
    pub timestamp: Option<Timestamp>,

    /// Yaw in radians.
    pub yaw: Option<f64>,

    /// Pitch in radians.
    pub pitch: Option<f64>,

    /// Roll in radians.
    pub roll: Option<f64>,
}

impl Attitude {
    /// Returns `true` if all three angles are present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.yaw.is_some() && self.pitch.is_some() && self.roll.is_some()
    }
}

/// User-applied acceleration per axis, in g.
///
/// Total device acceleration equals gravity plus this reading.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Acceleration {
    /// Time the reading was taken.
    pub timestamp: Option<Timestamp>,

    /// X-axis acceleration in g.
    pub x: Option<f64>,

    /// Y-axis acceleration in g.
    pub y: Option<f64>,

    /// Z-axis acceleration in g.
    pub z: Option<f64>,
}

impl Acceleration {
    /// Returns `true` if all three axes are present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.z.is_some()
    }
}

/// Gravity vector per axis in the device reference frame, in g.
///
/// Shares the shape of [`Acceleration`] but is a distinct record type; the
/// wire format logs the two on separate columns and they must never be
/// conflated.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gravity {
    /// Time the reading was taken.
    pub timestamp: Option<Timestamp>,

    /// X-axis component in g.
    pub x: Option<f64>,

    /// Y-axis component in g.
    pub y: Option<f64>,

    /// Z-axis component in g.
    pub z: Option<f64>,
}

impl Gravity {
    /// Returns `true` if all three axes are present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.z.is_some()
    }
}

/// Fused motion reading: gyroscope attitude, user acceleration and gravity
/// sampled together.
///
/// The nested records are pre-allocated by `Default`; the decoder descends
/// into them when resolving dotted field paths and never allocates nested
/// records itself.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceMotion {
    /// Time the reading was taken.
    pub timestamp: Option<Timestamp>,

    /// Attitude reported by the gyroscope.
    pub gyroscope: Attitude,

    /// User-applied acceleration.
    pub acceleration: Acceleration,

    /// Gravity vector.
    pub gravity: Gravity,
}

impl DeviceMotion {
    /// Returns `true` if every nested component is fully populated.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.gyroscope.is_complete()
            && self.acceleration.is_complete()
            && self.gravity.is_complete()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn attitude_completeness() {
        let mut att = Attitude::default();
        assert!(!att.is_complete());
        att.yaw = Some(0.1);
        att.pitch = Some(0.2);
        assert!(!att.is_complete());
        att.roll = Some(0.3);
        assert!(att.is_complete());
    }

    #[test]
    fn acceleration_and_gravity_are_distinct_types() {
        let acc = Acceleration {
            x: Some(0.0),
            y: Some(0.0),
            z: Some(1.0),
            ..Acceleration::default()
        };
        let grav = Gravity {
            x: Some(0.0),
            y: Some(0.0),
            z: Some(1.0),
            ..Gravity::default()
        };
        assert!(acc.is_complete());
        assert!(grav.is_complete());
    }

    #[test]
    fn device_motion_preallocates_nested() {
        let motion = DeviceMotion::default();
        assert!(motion.gyroscope.yaw.is_none());
        assert!(motion.acceleration.x.is_none());
        assert!(motion.gravity.z.is_none());
        assert!(!motion.is_complete());
    }

    #[test]
    fn device_motion_complete_when_all_nested_complete() {
        let mut motion = DeviceMotion::default();
        motion.gyroscope.yaw = Some(0.1);
        motion.gyroscope.pitch = Some(0.2);
        motion.gyroscope.roll = Some(0.3);
        motion.acceleration.x = Some(0.0);
        motion.acceleration.y = Some(0.0);
        motion.acceleration.z = Some(0.0);
        motion.gravity.x = Some(0.0);
        motion.gravity.y = Some(0.0);
        motion.gravity.z = Some(-1.0);
        assert!(motion.is_complete());
    }
}
