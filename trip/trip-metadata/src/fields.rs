//! The closed set of addressable record fields.
//!
//! The wire formats address fields by possibly-dotted names such as
//! `gps.latitude` or `gravity.z`. Instead of resolving those names by
//! reflection at decode time, every addressable field is a variant of
//! [`FieldPath`]; layouts are static `(FieldPath, column)` tables and the
//! decoder matches on `(record kind, path)` pairs. Nested paths descend
//! through the sub-record the target record pre-allocates.

use std::fmt;

/// One addressable field on some record type.
///
/// A `FieldPath` is meaningful only together with a record kind: `Latitude`
/// sets `latitude` on a position record but `gps.latitude` on a photo
/// frame's embedded position snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    /// Row capture time (legacy column layouts only).
    Time,
    /// Timestamp of a photo's embedded position snapshot.
    GpsTime,
    /// Latitude in decimal degrees.
    Latitude,
    /// Longitude in decimal degrees.
    Longitude,
    /// Altitude in meters.
    Altitude,
    /// Horizontal position accuracy in meters.
    HorizontalAccuracy,
    /// Vertical position accuracy in meters.
    VerticalAccuracy,
    /// GPS ground speed.
    GpsSpeed,
    /// Attitude yaw in radians.
    Yaw,
    /// Attitude pitch in radians.
    Pitch,
    /// Attitude roll in radians.
    Roll,
    /// Raw gyroscope X rate (early legacy layouts; no record consumes it).
    GyroX,
    /// Raw gyroscope Y rate (early legacy layouts; no record consumes it).
    GyroY,
    /// Raw gyroscope Z rate (early legacy layouts; no record consumes it).
    GyroZ,
    /// Acceleration X component in g.
    AccelX,
    /// Acceleration Y component in g.
    AccelY,
    /// Acceleration Z component in g.
    AccelZ,
    /// Gravity X component in g.
    GravityX,
    /// Gravity Y component in g.
    GravityY,
    /// Gravity Z component in g.
    GravityZ,
    /// Magnetometer X (unversioned layout only; no record consumes it).
    MagneticX,
    /// Magnetometer Y (unversioned layout only; no record consumes it).
    MagneticY,
    /// Magnetometer Z (unversioned layout only; no record consumes it).
    MagneticZ,
    /// Barometric pressure in kPa.
    Pressure,
    /// Compass heading in degrees from true north.
    Heading,
    /// Timestamp of a photo's embedded compass snapshot.
    CompassTime,
    /// On-board diagnostics speed in km/h.
    ObdSpeed,
    /// Timestamp of a photo's embedded diagnostics snapshot.
    ObdTime,
    /// Photo sequence index (photo-era legacy layouts).
    PhotoIndex,
    /// Video file index (video-era logs).
    VideoIndex,
    /// Frame index within the capture sequence.
    FrameIndex,
    /// Device platform name.
    PlatformName,
    /// Vendor OS name.
    OsRawName,
    /// Device OS version.
    OsVersion,
    /// Raw device model name.
    DeviceRawName,
    /// Recording app version.
    AppVersion,
    /// Recording app build number.
    AppBuildNumber,
    /// Recording type token (photo/video).
    RecordingKind,
    /// Camera horizontal field of view in degrees.
    HorizontalFov,
    /// Camera vertical field of view in degrees.
    VerticalFov,
    /// Camera aperture, verbatim.
    Aperture,
    /// EXIF focal length in millimeters.
    FocalLength,
    /// EXIF image width in pixels.
    ImageWidth,
    /// EXIF image height in pixels.
    ImageHeight,
}

impl FieldPath {
    /// The dotted wire name of this field, as the historic formats spell it.
    #[must_use]
    pub const fn dotted_name(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::GpsTime => "gps.timestamp",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Altitude => "altitude",
            Self::HorizontalAccuracy => "horizontal_accuracy",
            Self::VerticalAccuracy => "vertical_accuracy",
            Self::GpsSpeed => "gps.speed",
            Self::Yaw => "yaw",
            Self::Pitch => "pitch",
            Self::Roll => "roll",
            Self::GyroX => "gyroscope.x",
            Self::GyroY => "gyroscope.y",
            Self::GyroZ => "gyroscope.z",
            Self::AccelX => "acceleration.x",
            Self::AccelY => "acceleration.y",
            Self::AccelZ => "acceleration.z",
            Self::GravityX => "gravity.x",
            Self::GravityY => "gravity.y",
            Self::GravityZ => "gravity.z",
            Self::MagneticX => "magnetic.x",
            Self::MagneticY => "magnetic.y",
            Self::MagneticZ => "magnetic.z",
            Self::Pressure => "pressure",
            Self::Heading => "compass",
            Self::CompassTime => "compass.timestamp",
            Self::ObdSpeed => "obd.speed",
            Self::ObdTime => "obd.timestamp",
            Self::PhotoIndex => "index",
            Self::VideoIndex => "video_index",
            Self::FrameIndex => "frame_index",
            Self::PlatformName => "platform_name",
            Self::OsRawName => "os_raw_name",
            Self::OsVersion => "os_version",
            Self::DeviceRawName => "device_raw_name",
            Self::AppVersion => "app_version",
            Self::AppBuildNumber => "app_build_number",
            Self::RecordingKind => "recording_type",
            Self::HorizontalFov => "h_fov",
            Self::VerticalFov => "v_fov",
            Self::Aperture => "aperture",
            Self::FocalLength => "focal_length",
            Self::ImageWidth => "width",
            Self::ImageHeight => "height",
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dotted_name())
    }
}
