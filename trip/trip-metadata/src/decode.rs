//! Row decoding: column coercion onto typed records.
//!
//! A decoder never allocates nested sub-records; it descends into the
//! instances the record pre-allocates in `Default` and sets leaf fields.
//! An empty column leaves its target field unset, so absence is always
//! distinguishable from zero.

use trip_types::{RecordingType, Timestamp, TripRecord};

use crate::registry::RowParser;
use crate::{FieldPath, MetadataError};

/// 2014-01-01T00:00:00Z. Whole-second values after this instant are taken
/// to be repairable device timestamps.
const TIMESTAMP_REFERENCE_SECS: u64 = 1_388_534_400;

pub(crate) fn parse_f64(path: FieldPath, raw: &str) -> Result<f64, MetadataError> {
    raw.parse::<f64>()
        .map_err(|_| MetadataError::coercion(path.dotted_name(), format!("not a number: {raw:?}")))
}

pub(crate) fn parse_u64(path: FieldPath, raw: &str) -> Result<u64, MetadataError> {
    raw.parse::<u64>()
        .map_err(|_| MetadataError::coercion(path.dotted_name(), format!("not an index: {raw:?}")))
}

fn parse_u32(path: FieldPath, raw: &str) -> Result<u32, MetadataError> {
    raw.parse::<u32>().map_err(|_| {
        MetadataError::coercion(path.dotted_name(), format!("not a pixel count: {raw:?}"))
    })
}

fn parse_sub_timestamp(path: FieldPath, raw: &str) -> Result<Timestamp, MetadataError> {
    Ok(Timestamp::from_secs_f64(parse_f64(path, raw)?))
}

/// Parses a legacy time column, repairing the historic missing-separator
/// bug.
///
/// Some device firmware logged sub-second timestamps as one long integer
/// with the decimal point dropped (`1471117570183` meaning
/// `1471117570.183`). When a value has no separator, more than ten
/// digits, and its first ten digits land after the 2014-01-01 reference
/// instant as whole seconds, the separator is re-inserted after the
/// tenth digit. This is a compatibility shim for those firmware builds,
/// not a general timestamp rule; values carrying a separator pass
/// through unchanged.
///
/// # Errors
///
/// Returns [`MetadataError::Coercion`] when the value is not numeric.
pub fn parse_legacy_timestamp(raw: &str) -> Result<Timestamp, MetadataError> {
    if !raw.contains('.') && raw.len() > 10 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let (seconds, fraction) = raw.split_at(10);
        if let Ok(whole) = seconds.parse::<u64>() {
            if whole > TIMESTAMP_REFERENCE_SECS {
                let repaired = format!("{seconds}.{fraction}");
                return parse_sub_timestamp(FieldPath::Time, &repaired);
            }
        }
    }
    parse_sub_timestamp(FieldPath::Time, raw)
}

/// Sets one field addressed by `path` on `record` from a raw column value.
///
/// The caller has already filtered out empty columns; `raw` is non-empty.
///
/// # Errors
///
/// Returns [`MetadataError::Coercion`] when the value fails its typed
/// parse, or when `path` is not addressable on this record kind.
pub(crate) fn apply(
    record: &mut TripRecord,
    path: FieldPath,
    raw: &str,
) -> Result<(), MetadataError> {
    match (record, path) {
        (record, FieldPath::Time) => record.set_timestamp(parse_legacy_timestamp(raw)?),

        (TripRecord::Photo(r), FieldPath::VideoIndex) => {
            r.video_index = Some(parse_u64(path, raw)?);
        }
        (TripRecord::Photo(r), FieldPath::FrameIndex | FieldPath::PhotoIndex) => {
            r.frame_index = Some(parse_u64(path, raw)?);
        }
        (TripRecord::Photo(r), FieldPath::GpsTime) => {
            r.gps.timestamp = Some(parse_sub_timestamp(path, raw)?);
        }
        (TripRecord::Photo(r), FieldPath::Latitude) => {
            r.gps.latitude = Some(parse_f64(path, raw)?);
        }
        (TripRecord::Photo(r), FieldPath::Longitude) => {
            r.gps.longitude = Some(parse_f64(path, raw)?);
        }
        (TripRecord::Photo(r), FieldPath::HorizontalAccuracy) => {
            r.gps.horizontal_accuracy = Some(parse_f64(path, raw)?);
        }
        (TripRecord::Photo(r), FieldPath::GpsSpeed) => {
            r.gps.speed = Some(parse_f64(path, raw)?);
        }
        (TripRecord::Photo(r), FieldPath::CompassTime) => {
            r.compass.timestamp = Some(parse_sub_timestamp(path, raw)?);
        }
        (TripRecord::Photo(r), FieldPath::Heading) => {
            r.compass.heading = Some(parse_f64(path, raw)?);
        }
        (TripRecord::Photo(r), FieldPath::ObdTime) => {
            r.obd.timestamp = Some(parse_sub_timestamp(path, raw)?);
        }
        (TripRecord::Photo(r), FieldPath::ObdSpeed) => {
            r.obd.speed = Some(parse_f64(path, raw)?);
        }

        (TripRecord::Gps(r), FieldPath::Latitude) => r.latitude = Some(parse_f64(path, raw)?),
        (TripRecord::Gps(r), FieldPath::Longitude) => r.longitude = Some(parse_f64(path, raw)?),
        (TripRecord::Gps(r), FieldPath::Altitude) => r.altitude = Some(parse_f64(path, raw)?),
        (TripRecord::Gps(r), FieldPath::HorizontalAccuracy) => {
            r.horizontal_accuracy = Some(parse_f64(path, raw)?);
        }
        (TripRecord::Gps(r), FieldPath::VerticalAccuracy) => {
            r.vertical_accuracy = Some(parse_f64(path, raw)?);
        }
        (TripRecord::Gps(r), FieldPath::GpsSpeed) => r.speed = Some(parse_f64(path, raw)?),

        (TripRecord::Acceleration(r), FieldPath::AccelX) => r.x = Some(parse_f64(path, raw)?),
        (TripRecord::Acceleration(r), FieldPath::AccelY) => r.y = Some(parse_f64(path, raw)?),
        (TripRecord::Acceleration(r), FieldPath::AccelZ) => r.z = Some(parse_f64(path, raw)?),

        (TripRecord::Gravity(r), FieldPath::GravityX) => r.x = Some(parse_f64(path, raw)?),
        (TripRecord::Gravity(r), FieldPath::GravityY) => r.y = Some(parse_f64(path, raw)?),
        (TripRecord::Gravity(r), FieldPath::GravityZ) => r.z = Some(parse_f64(path, raw)?),

        (TripRecord::Attitude(r), FieldPath::Yaw) => r.yaw = Some(parse_f64(path, raw)?),
        (TripRecord::Attitude(r), FieldPath::Pitch) => r.pitch = Some(parse_f64(path, raw)?),
        (TripRecord::Attitude(r), FieldPath::Roll) => r.roll = Some(parse_f64(path, raw)?),

        (TripRecord::Compass(r), FieldPath::Heading) => r.heading = Some(parse_f64(path, raw)?),

        (TripRecord::Obd(r), FieldPath::ObdSpeed) => r.speed = Some(parse_f64(path, raw)?),

        (TripRecord::Pressure(r), FieldPath::Pressure) => {
            r.pressure = Some(parse_f64(path, raw)?);
        }

        (TripRecord::DeviceMotion(r), FieldPath::Yaw) => {
            r.gyroscope.yaw = Some(parse_f64(path, raw)?);
        }
        (TripRecord::DeviceMotion(r), FieldPath::Pitch) => {
            r.gyroscope.pitch = Some(parse_f64(path, raw)?);
        }
        (TripRecord::DeviceMotion(r), FieldPath::Roll) => {
            r.gyroscope.roll = Some(parse_f64(path, raw)?);
        }
        (TripRecord::DeviceMotion(r), FieldPath::AccelX) => {
            r.acceleration.x = Some(parse_f64(path, raw)?);
        }
        (TripRecord::DeviceMotion(r), FieldPath::AccelY) => {
            r.acceleration.y = Some(parse_f64(path, raw)?);
        }
        (TripRecord::DeviceMotion(r), FieldPath::AccelZ) => {
            r.acceleration.z = Some(parse_f64(path, raw)?);
        }
        (TripRecord::DeviceMotion(r), FieldPath::GravityX) => {
            r.gravity.x = Some(parse_f64(path, raw)?);
        }
        (TripRecord::DeviceMotion(r), FieldPath::GravityY) => {
            r.gravity.y = Some(parse_f64(path, raw)?);
        }
        (TripRecord::DeviceMotion(r), FieldPath::GravityZ) => {
            r.gravity.z = Some(parse_f64(path, raw)?);
        }

        (TripRecord::Device(r), FieldPath::PlatformName) => {
            r.platform_name = Some(raw.to_string());
        }
        (TripRecord::Device(r), FieldPath::OsRawName) => r.os_raw_name = Some(raw.to_string()),
        (TripRecord::Device(r), FieldPath::OsVersion) => r.os_version = Some(raw.to_string()),
        (TripRecord::Device(r), FieldPath::DeviceRawName) => {
            r.device_raw_name = Some(raw.to_string());
        }
        (TripRecord::Device(r), FieldPath::AppVersion) => r.app_version = Some(raw.to_string()),
        (TripRecord::Device(r), FieldPath::AppBuildNumber) => {
            r.app_build_number = Some(raw.to_string());
        }
        (TripRecord::Device(r), FieldPath::RecordingKind) => {
            r.recording_type = Some(RecordingType::classify(raw));
        }

        (TripRecord::Camera(r), FieldPath::HorizontalFov) => {
            r.h_fov = Some(parse_f64(path, raw)?);
        }
        (TripRecord::Camera(r), FieldPath::VerticalFov) => r.v_fov = Some(parse_f64(path, raw)?),
        (TripRecord::Camera(r), FieldPath::Aperture) => r.aperture = Some(raw.to_string()),

        (TripRecord::Exif(r), FieldPath::FocalLength) => {
            r.focal_length = Some(parse_f64(path, raw)?);
        }
        (TripRecord::Exif(r), FieldPath::ImageWidth) => r.width = Some(parse_u32(path, raw)?),
        (TripRecord::Exif(r), FieldPath::ImageHeight) => r.height = Some(parse_u32(path, raw)?),

        (_, path) => {
            return Err(MetadataError::coercion(
                path.dotted_name(),
                "field not addressable on this record kind",
            ));
        }
    }
    Ok(())
}

/// Decodes the data section of one current-format row.
///
/// # Errors
///
/// Returns [`MetadataError::RowDecode`] when the column count does not
/// equal the layout width or a declared column is out of range, and
/// [`MetadataError::Coercion`] when a value fails its typed parse. Both
/// are row-scoped; callers skip the row and continue.
pub fn decode_current_row(
    parser: &RowParser,
    timestamp: Timestamp,
    data: &str,
) -> Result<TripRecord, MetadataError> {
    let columns: Vec<&str> = data.split(';').collect();
    if columns.len() != parser.layout.width() {
        return Err(MetadataError::row_decode(format!(
            "{} row has {} columns, layout expects {}",
            parser.name,
            columns.len(),
            parser.layout.width()
        )));
    }

    let mut record = TripRecord::empty(parser.kind);
    record.set_timestamp(timestamp);
    for &(path, column) in parser.layout.entries() {
        let Some(raw) = columns.get(column) else {
            return Err(MetadataError::row_decode(format!(
                "{} maps {path} to column {column}, past the row width",
                parser.name
            )));
        };
        if raw.is_empty() {
            continue;
        }
        apply(&mut record, path, raw)?;
    }
    if let Some(post) = parser.post_decode {
        post(&mut record);
    }
    Ok(record)
}
