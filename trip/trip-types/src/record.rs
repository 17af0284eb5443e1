//! The record sum type and the shared timestamped-record capability.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Acceleration, Attitude, CameraParameters, Compass, DeviceIdentity, DeviceMotion,
    ExifParameters, GpsRecord, Gravity, Obd, PhotoFrame, Pressure, Timestamp,
};

/// Capability shared by every concrete sensor record: a timestamp in
/// seconds with sub-millisecond precision.
pub trait SensorRecord {
    /// Time the record was captured, when known.
    fn timestamp(&self) -> Option<Timestamp>;
}

macro_rules! impl_sensor_record {
    ($($ty:ty),* $(,)?) => {
        $(impl SensorRecord for $ty {
            fn timestamp(&self) -> Option<Timestamp> {
                self.timestamp
            }
        })*
    };
}

impl_sensor_record!(
    PhotoFrame,
    GpsRecord,
    Acceleration,
    Gravity,
    Attitude,
    Compass,
    Obd,
    Pressure,
    DeviceMotion,
    DeviceIdentity,
    CameraParameters,
    ExifParameters,
);

/// Discriminant for the closed set of record types a log can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RecordKind {
    /// Photo/video frame index record.
    Photo,
    /// GPS position record.
    Gps,
    /// User acceleration record.
    Acceleration,
    /// Gravity vector record.
    Gravity,
    /// Attitude (yaw/pitch/roll) record.
    Attitude,
    /// Compass heading record.
    Compass,
    /// On-board diagnostics record.
    Obd,
    /// Barometric pressure record.
    Pressure,
    /// Fused device-motion record.
    DeviceMotion,
    /// Device identity record.
    Device,
    /// Camera parameters record.
    Camera,
    /// EXIF parameters record.
    Exif,
}

impl RecordKind {
    /// The row-type name this kind is declared under in log headers.
    #[must_use]
    pub const fn row_name(self) -> &'static str {
        match self {
            Self::Photo => "PHOTO",
            Self::Gps => "GPS",
            Self::Acceleration => "ACCELERATION",
            Self::Gravity => "GRAVITY",
            Self::Attitude => "ATTITUDE",
            Self::Compass => "COMPASS",
            Self::Obd => "OBD",
            Self::Pressure => "PRESSURE",
            Self::DeviceMotion => "DEVICEMOTION",
            Self::Device => "DEVICE",
            Self::Camera => "CAMERA",
            Self::Exif => "EXIF",
        }
    }
}

/// One decoded record of any kind.
///
/// This is the unit the stream readers hand out. Use [`TripRecord::kind`]
/// to dispatch, or the `as_*` accessors to borrow the concrete record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TripRecord {
    /// Photo/video frame index record.
    Photo(PhotoFrame),
    /// GPS position record.
    Gps(GpsRecord),
    /// User acceleration record.
    Acceleration(Acceleration),
    /// Gravity vector record.
    Gravity(Gravity),
    /// Attitude record.
    Attitude(Attitude),
    /// Compass heading record.
    Compass(Compass),
    /// On-board diagnostics record.
    Obd(Obd),
    /// Barometric pressure record.
    Pressure(Pressure),
    /// Fused device-motion record.
    DeviceMotion(DeviceMotion),
    /// Device identity record.
    Device(DeviceIdentity),
    /// Camera parameters record.
    Camera(CameraParameters),
    /// EXIF parameters record.
    Exif(ExifParameters),
}

impl TripRecord {
    /// Creates an empty record of the given kind, nested sub-records
    /// pre-allocated.
    #[must_use]
    pub fn empty(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Photo => Self::Photo(PhotoFrame::default()),
            RecordKind::Gps => Self::Gps(GpsRecord::default()),
            RecordKind::Acceleration => Self::Acceleration(Acceleration::default()),
            RecordKind::Gravity => Self::Gravity(Gravity::default()),
            RecordKind::Attitude => Self::Attitude(Attitude::default()),
            RecordKind::Compass => Self::Compass(Compass::default()),
            RecordKind::Obd => Self::Obd(Obd::default()),
            RecordKind::Pressure => Self::Pressure(Pressure::default()),
            RecordKind::DeviceMotion => Self::DeviceMotion(DeviceMotion::default()),
            RecordKind::Device => Self::Device(DeviceIdentity::default()),
            RecordKind::Camera => Self::Camera(CameraParameters::default()),
            RecordKind::Exif => Self::Exif(ExifParameters::default()),
        }
    }

    /// The discriminant of this record.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Photo(_) => RecordKind::Photo,
            Self::Gps(_) => RecordKind::Gps,
            Self::Acceleration(_) => RecordKind::Acceleration,
            Self::Gravity(_) => RecordKind::Gravity,
            Self::Attitude(_) => RecordKind::Attitude,
            Self::Compass(_) => RecordKind::Compass,
            Self::Obd(_) => RecordKind::Obd,
            Self::Pressure(_) => RecordKind::Pressure,
            Self::DeviceMotion(_) => RecordKind::DeviceMotion,
            Self::Device(_) => RecordKind::Device,
            Self::Camera(_) => RecordKind::Camera,
            Self::Exif(_) => RecordKind::Exif,
        }
    }

    /// Sets the record's own timestamp.
    pub fn set_timestamp(&mut self, ts: Timestamp) {
        match self {
            Self::Photo(r) => r.timestamp = Some(ts),
            Self::Gps(r) => r.timestamp = Some(ts),
            Self::Acceleration(r) => r.timestamp = Some(ts),
            Self::Gravity(r) => r.timestamp = Some(ts),
            Self::Attitude(r) => r.timestamp = Some(ts),
            Self::Compass(r) => r.timestamp = Some(ts),
            Self::Obd(r) => r.timestamp = Some(ts),
            Self::Pressure(r) => r.timestamp = Some(ts),
            Self::DeviceMotion(r) => r.timestamp = Some(ts),
            Self::Device(r) => r.timestamp = Some(ts),
            Self::Camera(r) => r.timestamp = Some(ts),
            Self::Exif(r) => r.timestamp = Some(ts),
        }
    }

    /// Borrows the photo frame, if this is one.
    #[must_use]
    pub const fn as_photo(&self) -> Option<&PhotoFrame> {
        match self {
            Self::Photo(r) => Some(r),
            _ => None,
        }
    }

    /// Borrows the GPS record, if this is one.
    #[must_use]
    pub const fn as_gps(&self) -> Option<&GpsRecord> {
        match self {
            Self::Gps(r) => Some(r),
            _ => None,
        }
    }

    /// Borrows the device identity, if this is one.
    #[must_use]
    pub const fn as_device(&self) -> Option<&DeviceIdentity> {
        match self {
            Self::Device(r) => Some(r),
            _ => None,
        }
    }

    /// Consumes the record, returning the photo frame if this is one.
    #[must_use]
    pub fn into_photo(self) -> Option<PhotoFrame> {
        match self {
            Self::Photo(r) => Some(r),
            _ => None,
        }
    }
}

impl SensorRecord for TripRecord {
    fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Photo(r) => r.timestamp(),
            Self::Gps(r) => r.timestamp(),
            Self::Acceleration(r) => r.timestamp(),
            Self::Gravity(r) => r.timestamp(),
            Self::Attitude(r) => r.timestamp(),
            Self::Compass(r) => r.timestamp(),
            Self::Obd(r) => r.timestamp(),
            Self::Pressure(r) => r.timestamp(),
            Self::DeviceMotion(r) => r.timestamp(),
            Self::Device(r) => r.timestamp(),
            Self::Camera(r) => r.timestamp(),
            Self::Exif(r) => r.timestamp(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_matches_kind() {
        for kind in [
            RecordKind::Photo,
            RecordKind::Gps,
            RecordKind::Acceleration,
            RecordKind::Gravity,
            RecordKind::Attitude,
            RecordKind::Compass,
            RecordKind::Obd,
            RecordKind::Pressure,
            RecordKind::DeviceMotion,
            RecordKind::Device,
            RecordKind::Camera,
            RecordKind::Exif,
        ] {
            assert_eq!(TripRecord::empty(kind).kind(), kind);
        }
    }

    #[test]
    fn row_names_are_uppercase_and_unique() {
        let names = [
            RecordKind::Photo.row_name(),
            RecordKind::Gps.row_name(),
            RecordKind::Acceleration.row_name(),
            RecordKind::Gravity.row_name(),
            RecordKind::Attitude.row_name(),
            RecordKind::Compass.row_name(),
            RecordKind::Obd.row_name(),
            RecordKind::Pressure.row_name(),
            RecordKind::DeviceMotion.row_name(),
            RecordKind::Device.row_name(),
            RecordKind::Camera.row_name(),
            RecordKind::Exif.row_name(),
        ];
        for (i, a) in names.iter().enumerate() {
            assert_eq!(a.to_uppercase(), **a);
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn set_timestamp_reaches_every_variant() {
        let ts = Timestamp::from_secs_f64(7.0);
        let mut record = TripRecord::empty(RecordKind::Pressure);
        record.set_timestamp(ts);
        assert_eq!(record.timestamp(), Some(ts));
    }

    #[test]
    fn accessors_match_variant() {
        let record = TripRecord::empty(RecordKind::Photo);
        assert!(record.as_photo().is_some());
        assert!(record.as_gps().is_none());
        assert!(record.into_photo().is_some());
    }
}
