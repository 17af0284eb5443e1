//! The format registry: every known column layout, current and legacy.
//!
//! Layouts are immutable static tables. Adding a new row-type version is
//! purely additive data here; decoder and correlation logic never change.
//! The legacy tables reproduce the historic device firmware column
//! assignments bit-exact and must not be normalized.

use trip_types::{RecordKind, RecordingType, TripRecord};

use crate::{FieldPath, MetadataError, VersionTag};

use FieldPath::{
    AccelX, AccelY, AccelZ, Altitude, AppBuildNumber, AppVersion, Aperture, CompassTime,
    DeviceRawName, FocalLength, FrameIndex, GpsSpeed, GpsTime, GravityX, GravityY, GravityZ,
    GyroX, GyroY, GyroZ, Heading, HorizontalAccuracy, HorizontalFov, ImageHeight, ImageWidth,
    Latitude, Longitude, MagneticX, MagneticY, MagneticZ, ObdSpeed, ObdTime, OsRawName,
    OsVersion, PhotoIndex, Pitch, PlatformName, Pressure, RecordingKind, Roll, Time,
    VerticalAccuracy, VerticalFov, VideoIndex, Yaw,
};

/// An ordered field-path → column-index mapping for one row shape.
#[derive(Debug, Clone, Copy)]
pub struct ColumnLayout {
    entries: &'static [(FieldPath, usize)],
}

impl ColumnLayout {
    /// Creates a layout. A layout with zero entries is invalid; since all
    /// layouts are static, the check fires at compile time.
    #[must_use]
    pub const fn new(entries: &'static [(FieldPath, usize)]) -> Self {
        assert!(!entries.is_empty(), "layout with zero column entries");
        Self { entries }
    }

    /// Number of columns a row of this shape must carry.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.entries.len()
    }

    /// The declared `(field, column)` pairs, in table order.
    #[must_use]
    pub const fn entries(&self) -> &'static [(FieldPath, usize)] {
        self.entries
    }

    /// Column index of `path`, if this layout maps it.
    #[must_use]
    pub fn column(&self, path: FieldPath) -> Option<usize> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == path)
            .map(|&(_, column)| column)
    }
}

/// A registered parser for one version of one current-format row type.
#[derive(Debug, Clone, Copy)]
pub struct RowParser {
    /// Row-type name as declared in ALIAS lines, e.g. `"GPS"`.
    pub name: &'static str,
    /// Parser version; an alias matches every parser with
    /// `version >= min_compatible_version`.
    pub version: u32,
    /// Record kind this parser produces.
    pub kind: RecordKind,
    /// Column layout of the row's data section.
    pub layout: ColumnLayout,
    /// Post-decode adjustment, applied after all columns are set.
    pub post_decode: Option<fn(&mut TripRecord)>,
}

fn camera_v1_post(record: &mut TripRecord) {
    // The v1 firmware logged a vertical FoV value that cannot be trusted;
    // the column is read for width checking but the field stays unset.
    if let TripRecord::Camera(camera) = record {
        camera.v_fov = None;
    }
}

/// Every registered current-format parser, in registration order.
///
/// When several parsers are compatible with one alias, the first one in
/// this order is used.
static CURRENT_PARSERS: &[RowParser] = &[
    RowParser {
        name: "PHOTO",
        version: 1,
        kind: RecordKind::Photo,
        layout: ColumnLayout::new(&[
            (VideoIndex, 0),
            (FrameIndex, 1),
            (GpsTime, 2),
            (Latitude, 3),
            (Longitude, 4),
            (HorizontalAccuracy, 5),
            (GpsSpeed, 6),
            (CompassTime, 7),
            (Heading, 8),
            (ObdTime, 9),
            (ObdSpeed, 10),
        ]),
        post_decode: None,
    },
    RowParser {
        name: "GPS",
        version: 1,
        kind: RecordKind::Gps,
        layout: ColumnLayout::new(&[
            (Latitude, 0),
            (Longitude, 1),
            (Altitude, 2),
            (HorizontalAccuracy, 3),
            (VerticalAccuracy, 4),
            (GpsSpeed, 5),
        ]),
        post_decode: None,
    },
    RowParser {
        name: "ACCELERATION",
        version: 1,
        kind: RecordKind::Acceleration,
        layout: ColumnLayout::new(&[(AccelX, 0), (AccelY, 1), (AccelZ, 2)]),
        post_decode: None,
    },
    RowParser {
        name: "COMPASS",
        version: 1,
        kind: RecordKind::Compass,
        layout: ColumnLayout::new(&[(Heading, 0)]),
        post_decode: None,
    },
    RowParser {
        name: "OBD",
        version: 1,
        kind: RecordKind::Obd,
        layout: ColumnLayout::new(&[(ObdSpeed, 0)]),
        post_decode: None,
    },
    RowParser {
        name: "PRESSURE",
        version: 1,
        kind: RecordKind::Pressure,
        layout: ColumnLayout::new(&[(Pressure, 0)]),
        post_decode: None,
    },
    RowParser {
        name: "ATTITUDE",
        version: 1,
        kind: RecordKind::Attitude,
        layout: ColumnLayout::new(&[(Yaw, 0), (Pitch, 1), (Roll, 2)]),
        post_decode: None,
    },
    RowParser {
        name: "GRAVITY",
        version: 1,
        kind: RecordKind::Gravity,
        layout: ColumnLayout::new(&[(GravityX, 0), (GravityY, 1), (GravityZ, 2)]),
        post_decode: None,
    },
    RowParser {
        name: "DEVICE",
        version: 1,
        kind: RecordKind::Device,
        layout: ColumnLayout::new(&[
            (PlatformName, 0),
            (OsRawName, 1),
            (OsVersion, 2),
            (DeviceRawName, 3),
            (AppVersion, 4),
            (AppBuildNumber, 5),
            (RecordingKind, 6),
        ]),
        post_decode: None,
    },
    RowParser {
        name: "DEVICEMOTION",
        version: 1,
        kind: RecordKind::DeviceMotion,
        layout: ColumnLayout::new(&[
            (Yaw, 0),
            (Pitch, 1),
            (Roll, 2),
            (AccelX, 3),
            (AccelY, 4),
            (AccelZ, 5),
            (GravityX, 6),
            (GravityY, 7),
            (GravityZ, 8),
        ]),
        post_decode: None,
    },
    RowParser {
        name: "CAMERA",
        version: 1,
        kind: RecordKind::Camera,
        layout: ColumnLayout::new(&[(HorizontalFov, 0), (VerticalFov, 1), (Aperture, 2)]),
        post_decode: Some(camera_v1_post),
    },
    RowParser {
        name: "CAMERA",
        version: 2,
        kind: RecordKind::Camera,
        layout: ColumnLayout::new(&[(HorizontalFov, 0), (VerticalFov, 1), (Aperture, 2)]),
        post_decode: None,
    },
    // The v1 EXIF table is reproduced as shipped: its single entry points
    // past the declared width, so every v1 EXIF row fails the column-range
    // check and decodes to nothing.
    RowParser {
        name: "EXIF",
        version: 1,
        kind: RecordKind::Exif,
        layout: ColumnLayout::new(&[(FocalLength, 1)]),
        post_decode: None,
    },
    RowParser {
        name: "EXIF",
        version: 2,
        kind: RecordKind::Exif,
        layout: ColumnLayout::new(&[(FocalLength, 0), (ImageWidth, 1), (ImageHeight, 2)]),
        post_decode: None,
    },
];

/// Returns every registered parser compatible with a header declaration:
/// matching row-type name and `version >= min_version`, in registration
/// order.
#[must_use]
pub fn parsers_for(name: &str, min_version: u32) -> Vec<&'static RowParser> {
    CURRENT_PARSERS
        .iter()
        .filter(|parser| parser.name == name && parser.version >= min_version)
        .collect()
}

/// Like [`parsers_for`], but a query-scoped error when nothing matches.
///
/// # Errors
///
/// Returns [`MetadataError::Registry`] when no registered parser is
/// compatible.
pub fn compatible_parsers(
    name: &str,
    min_version: u32,
) -> Result<Vec<&'static RowParser>, MetadataError> {
    let parsers = parsers_for(name, min_version);
    if parsers.is_empty() {
        return Err(MetadataError::registry(format!(
            "no parser for row type {name:?} compatible with version >= {min_version}"
        )));
    }
    Ok(parsers)
}

/// The newest registered parser producing `kind`, used when serializing.
#[must_use]
pub(crate) fn newest_parser(kind: RecordKind) -> Option<&'static RowParser> {
    CURRENT_PARSERS
        .iter()
        .filter(|parser| parser.kind == kind)
        .max_by_key(|parser| parser.version)
}

const V_1_0_1: VersionTag = VersionTag::three_part(1, 0, 1);
const V_1_0_2: VersionTag = VersionTag::three_part(1, 0, 2);
const V_1_0_3: VersionTag = VersionTag::three_part(1, 0, 3);
const V_1_0_4: VersionTag = VersionTag::three_part(1, 0, 4);
const V_1_0_5: VersionTag = VersionTag::three_part(1, 0, 5);
const V_1_0_6: VersionTag = VersionTag::three_part(1, 0, 6);
const V_1_0_7: VersionTag = VersionTag::three_part(1, 0, 7);
const V_1_0_8: VersionTag = VersionTag::three_part(1, 0, 8);
const V_1_1: VersionTag = VersionTag::two_part(1, 1);
const V_1_1_1: VersionTag = VersionTag::three_part(1, 1, 1);
const V_1_1_2: VersionTag = VersionTag::three_part(1, 1, 2);
const V_1_1_3: VersionTag = VersionTag::three_part(1, 1, 3);
const V_1_1_4: VersionTag = VersionTag::three_part(1, 1, 4);
const V_1_1_5: VersionTag = VersionTag::three_part(1, 1, 5);
const V_1_1_6: VersionTag = VersionTag::three_part(1, 1, 6);

// ts;lon;lat;elv;h_accu;gyroX;gyroY;gyroZ;accX;accY;accZ;pres;magX;magY;magZ;index
static LAYOUT_UNVERSIONED: ColumnLayout = ColumnLayout::new(&[
    (Time, 0),
    (Longitude, 1),
    (Latitude, 2),
    (Altitude, 3),
    (HorizontalAccuracy, 4),
    (GyroX, 5),
    (GyroY, 6),
    (GyroZ, 7),
    (AccelX, 8),
    (AccelY, 9),
    (AccelZ, 10),
    (Pressure, 11),
    (MagneticX, 12),
    (MagneticY, 13),
    (MagneticZ, 14),
    (PhotoIndex, 15),
]);

// ts;lon;lat;elv;h_accu;gyroX;gyroY;gyroZ;accX;accY;accZ;pres;comp;index
static LAYOUT_1_0_1: ColumnLayout = ColumnLayout::new(&[
    (Time, 0),
    (Longitude, 1),
    (Latitude, 2),
    (Altitude, 3),
    (HorizontalAccuracy, 4),
    (GyroX, 5),
    (GyroY, 6),
    (GyroZ, 7),
    (AccelX, 8),
    (AccelY, 9),
    (AccelZ, 10),
    (Pressure, 11),
    (Heading, 12),
    (PhotoIndex, 13),
]);

// ts;lon;lat;elv;h_accu;gyroX;gyroY;gyroZ;accX;accY;accZ;pres;comp;index;gX;gY;gZ
static LAYOUT_1_0_3: ColumnLayout = ColumnLayout::new(&[
    (Time, 0),
    (Longitude, 1),
    (Latitude, 2),
    (Altitude, 3),
    (HorizontalAccuracy, 4),
    (GyroX, 5),
    (GyroY, 6),
    (GyroZ, 7),
    (AccelX, 8),
    (AccelY, 9),
    (AccelZ, 10),
    (Pressure, 11),
    (Heading, 12),
    (PhotoIndex, 13),
    (GravityX, 14),
    (GravityY, 15),
    (GravityZ, 16),
]);

// ts;lon;lat;elv;h_accu;yaw;pitch;roll;accX;accY;accZ;pres;comp;index;gX;gY;gZ
static LAYOUT_1_0_4: ColumnLayout = ColumnLayout::new(&[
    (Time, 0),
    (Longitude, 1),
    (Latitude, 2),
    (Altitude, 3),
    (HorizontalAccuracy, 4),
    (Yaw, 5),
    (Pitch, 6),
    (Roll, 7),
    (AccelX, 8),
    (AccelY, 9),
    (AccelZ, 10),
    (Pressure, 11),
    (Heading, 12),
    (PhotoIndex, 13),
    (GravityX, 14),
    (GravityY, 15),
    (GravityZ, 16),
]);

// ts;lon;lat;elv;h_accu;GPSs;yaw;pitch;roll;accX;accY;accZ;pres;comp;index;gX;gY;gZ
static LAYOUT_1_0_5: ColumnLayout = ColumnLayout::new(&[
    (Time, 0),
    (Longitude, 1),
    (Latitude, 2),
    (Altitude, 3),
    (HorizontalAccuracy, 4),
    (GpsSpeed, 5),
    (Yaw, 6),
    (Pitch, 7),
    (Roll, 8),
    (AccelX, 9),
    (AccelY, 10),
    (AccelZ, 11),
    (Pressure, 12),
    (Heading, 13),
    (PhotoIndex, 14),
    (GravityX, 15),
    (GravityY, 16),
    (GravityZ, 17),
]);

// ts;lon;lat;elv;h_accu;GPSs;yaw;pitch;roll;accX;accY;accZ;pres;comp;index;gX;gY;gZ;OBDs
static LAYOUT_1_0_6: ColumnLayout = ColumnLayout::new(&[
    (Time, 0),
    (Longitude, 1),
    (Latitude, 2),
    (Altitude, 3),
    (HorizontalAccuracy, 4),
    (GpsSpeed, 5),
    (Yaw, 6),
    (Pitch, 7),
    (Roll, 8),
    (AccelX, 9),
    (AccelY, 10),
    (AccelZ, 11),
    (Pressure, 12),
    (Heading, 13),
    (PhotoIndex, 14),
    (GravityX, 15),
    (GravityY, 16),
    (GravityZ, 17),
    (ObdSpeed, 18),
]);

// ts;lon;lat;elv;h_accu;GPSs;yaw;pitch;roll;accX;accY;accZ;pres;comp;vIndex;tFIndex;gX;gY;gZ;OBDs
static LAYOUT_1_1: ColumnLayout = ColumnLayout::new(&[
    (Time, 0),
    (Longitude, 1),
    (Latitude, 2),
    (Altitude, 3),
    (HorizontalAccuracy, 4),
    (GpsSpeed, 5),
    (Yaw, 6),
    (Pitch, 7),
    (Roll, 8),
    (AccelX, 9),
    (AccelY, 10),
    (AccelZ, 11),
    (Pressure, 12),
    (Heading, 13),
    (VideoIndex, 14),
    (FrameIndex, 15),
    (GravityX, 16),
    (GravityY, 17),
    (GravityZ, 18),
    (ObdSpeed, 19),
]);

// ts;lon;lat;elv;h_accu;GPSs;yaw;pitch;roll;accX;accY;accZ;pres;comp;vIndex;tFIndex;gX;gY;gZ;OBDs;v_accu
static LAYOUT_1_1_5: ColumnLayout = ColumnLayout::new(&[
    (Time, 0),
    (Longitude, 1),
    (Latitude, 2),
    (Altitude, 3),
    (HorizontalAccuracy, 4),
    (GpsSpeed, 5),
    (Yaw, 6),
    (Pitch, 7),
    (Roll, 8),
    (AccelX, 9),
    (AccelY, 10),
    (AccelZ, 11),
    (Pressure, 12),
    (Heading, 13),
    (VideoIndex, 14),
    (FrameIndex, 15),
    (GravityX, 16),
    (GravityY, 17),
    (GravityZ, 18),
    (ObdSpeed, 19),
    (VerticalAccuracy, 20),
]);

/// Legacy layout table, one entry per known firmware version tag.
static LEGACY_LAYOUTS: &[(VersionTag, &ColumnLayout)] = &[
    (VersionTag::Unversioned, &LAYOUT_UNVERSIONED),
    (V_1_0_1, &LAYOUT_1_0_1),
    (V_1_0_2, &LAYOUT_1_0_1),
    (V_1_0_3, &LAYOUT_1_0_3),
    (V_1_0_4, &LAYOUT_1_0_4),
    (V_1_0_5, &LAYOUT_1_0_5),
    (V_1_0_6, &LAYOUT_1_0_6),
    (V_1_0_7, &LAYOUT_1_0_6),
    (V_1_0_8, &LAYOUT_1_0_6),
    (V_1_1, &LAYOUT_1_1),
    (V_1_1_1, &LAYOUT_1_1),
    (V_1_1_2, &LAYOUT_1_1),
    (V_1_1_3, &LAYOUT_1_1),
    (V_1_1_4, &LAYOUT_1_1),
    (V_1_1_5, &LAYOUT_1_1_5),
    (V_1_1_6, &LAYOUT_1_1_5),
];

/// Resolves the fixed column layout for a detected legacy version tag.
#[must_use]
pub fn legacy_layout(version: &VersionTag) -> Option<&'static ColumnLayout> {
    LEGACY_LAYOUTS
        .iter()
        .find(|(tag, _)| tag == version)
        .map(|&(_, layout)| layout)
}

/// Recording type the historic version table declares for a legacy tag.
///
/// Tags through `1.0.8` recorded photos, `1.1` through `1.1.5` video.
/// `1.1.6` has no entry in the historic table and reports `None`.
#[must_use]
pub fn legacy_recording_type(version: &VersionTag) -> Option<RecordingType> {
    if *version == V_1_1_6 {
        return None;
    }
    legacy_layout(version)?;
    if *version <= V_1_0_8 {
        Some(RecordingType::Photo)
    } else {
        Some(RecordingType::Video)
    }
}
