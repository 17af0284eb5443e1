//! Serializing records back to the current self-describing format.
//!
//! The writer only ever emits the 2.0 layout: a `METADATA:2.0` marker,
//! one `ALIAS` declaration per row type present, body rows sorted by
//! timestamp, and the `END` marker. Legacy layouts are read-only history
//! and are never written.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;
use trip_types::{RecordingType, SensorRecord, Timestamp, TripRecord};

use crate::registry::{self, RowParser};
use crate::{FieldPath, MetadataError};

/// Writes `records` to `path` as a current-format log.
///
/// Row types are declared at the newest registered parser version, so
/// re-reading the file decodes exactly what was written. Records are
/// sorted by timestamp; ties keep their input order.
///
/// # Errors
///
/// Returns [`MetadataError::Io`] when the file cannot be written and
/// [`MetadataError::Registry`] when a record kind has no registered
/// parser.
pub fn write_current_log(
    path: impl AsRef<Path>,
    records: &[TripRecord],
) -> Result<(), MetadataError> {
    let path = path.as_ref();
    let bindings = alias_bindings(records)?;
    let mut sorted: Vec<&TripRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        let key = |record: &TripRecord| {
            record
                .timestamp()
                .map_or(f64::NEG_INFINITY, |ts| ts.as_secs_f64())
        };
        key(a).total_cmp(&key(b))
    });

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", crate::reader::FORMAT_MARKER)?;
    writeln!(out, "HEADER")?;
    for (alias, parser) in &bindings {
        writeln!(
            out,
            "ALIAS:{alias};{};{};{}",
            parser.name, parser.version, parser.version
        )?;
    }
    writeln!(out, "BODY")?;
    for record in sorted {
        let Some((alias, parser)) = bindings
            .iter()
            .find(|(_, parser)| parser.kind == record.kind())
        else {
            continue;
        };
        let timestamp = record.timestamp().unwrap_or_else(Timestamp::zero);
        writeln!(out, "{timestamp}:{alias}:{}", serialize_row(record, parser))?;
    }
    writeln!(out, "END")?;
    out.flush()?;
    debug!(path = %path.display(), rows = records.len(), "wrote current-format log");
    Ok(())
}

/// Assigns one alias per record kind present, in first-appearance order.
fn alias_bindings(
    records: &[TripRecord],
) -> Result<Vec<(String, &'static RowParser)>, MetadataError> {
    let mut bindings: Vec<(String, &'static RowParser)> = Vec::new();
    for record in records {
        let kind = record.kind();
        if bindings.iter().any(|(_, parser)| parser.kind == kind) {
            continue;
        }
        let parser = registry::newest_parser(kind).ok_or_else(|| {
            MetadataError::registry(format!("no parser registered for {}", kind.row_name()))
        })?;
        let alias = (bindings.len() + 1).to_string();
        bindings.push((alias, parser));
    }
    Ok(bindings)
}

fn serialize_row(record: &TripRecord, parser: &RowParser) -> String {
    let mut columns = vec![String::new(); parser.layout.width()];
    for &(path, column) in parser.layout.entries() {
        if let (Some(slot), Some(value)) = (columns.get_mut(column), extract(record, path)) {
            *slot = value;
        }
    }
    columns.join(";")
}

/// Reads one addressed field back out of a record as its wire text.
/// Unset fields serialize as the empty column.
fn extract(record: &TripRecord, path: FieldPath) -> Option<String> {
    let float = |value: Option<f64>| value.map(|v| v.to_string());
    let index = |value: Option<u64>| value.map(|v| v.to_string());
    match (record, path) {
        (TripRecord::Photo(r), FieldPath::VideoIndex) => index(r.video_index),
        (TripRecord::Photo(r), FieldPath::FrameIndex) => index(r.frame_index),
        (TripRecord::Photo(r), FieldPath::GpsTime) => r.gps.timestamp.map(|ts| ts.to_string()),
        (TripRecord::Photo(r), FieldPath::Latitude) => float(r.gps.latitude),
        (TripRecord::Photo(r), FieldPath::Longitude) => float(r.gps.longitude),
        (TripRecord::Photo(r), FieldPath::HorizontalAccuracy) => float(r.gps.horizontal_accuracy),
        (TripRecord::Photo(r), FieldPath::GpsSpeed) => float(r.gps.speed),
        (TripRecord::Photo(r), FieldPath::CompassTime) => {
            r.compass.timestamp.map(|ts| ts.to_string())
        }
        (TripRecord::Photo(r), FieldPath::Heading) => float(r.compass.heading),
        (TripRecord::Photo(r), FieldPath::ObdTime) => r.obd.timestamp.map(|ts| ts.to_string()),
        (TripRecord::Photo(r), FieldPath::ObdSpeed) => float(r.obd.speed),

        (TripRecord::Gps(r), FieldPath::Latitude) => float(r.latitude),
        (TripRecord::Gps(r), FieldPath::Longitude) => float(r.longitude),
        (TripRecord::Gps(r), FieldPath::Altitude) => float(r.altitude),
        (TripRecord::Gps(r), FieldPath::HorizontalAccuracy) => float(r.horizontal_accuracy),
        (TripRecord::Gps(r), FieldPath::VerticalAccuracy) => float(r.vertical_accuracy),
        (TripRecord::Gps(r), FieldPath::GpsSpeed) => float(r.speed),

        (TripRecord::Acceleration(r), FieldPath::AccelX) => float(r.x),
        (TripRecord::Acceleration(r), FieldPath::AccelY) => float(r.y),
        (TripRecord::Acceleration(r), FieldPath::AccelZ) => float(r.z),

        (TripRecord::Gravity(r), FieldPath::GravityX) => float(r.x),
        (TripRecord::Gravity(r), FieldPath::GravityY) => float(r.y),
        (TripRecord::Gravity(r), FieldPath::GravityZ) => float(r.z),

        (TripRecord::Attitude(r), FieldPath::Yaw) => float(r.yaw),
        (TripRecord::Attitude(r), FieldPath::Pitch) => float(r.pitch),
        (TripRecord::Attitude(r), FieldPath::Roll) => float(r.roll),

        (TripRecord::Compass(r), FieldPath::Heading) => float(r.heading),
        (TripRecord::Obd(r), FieldPath::ObdSpeed) => float(r.speed),
        (TripRecord::Pressure(r), FieldPath::Pressure) => float(r.pressure),

        (TripRecord::DeviceMotion(r), FieldPath::Yaw) => float(r.gyroscope.yaw),
        (TripRecord::DeviceMotion(r), FieldPath::Pitch) => float(r.gyroscope.pitch),
        (TripRecord::DeviceMotion(r), FieldPath::Roll) => float(r.gyroscope.roll),
        (TripRecord::DeviceMotion(r), FieldPath::AccelX) => float(r.acceleration.x),
        (TripRecord::DeviceMotion(r), FieldPath::AccelY) => float(r.acceleration.y),
        (TripRecord::DeviceMotion(r), FieldPath::AccelZ) => float(r.acceleration.z),
        (TripRecord::DeviceMotion(r), FieldPath::GravityX) => float(r.gravity.x),
        (TripRecord::DeviceMotion(r), FieldPath::GravityY) => float(r.gravity.y),
        (TripRecord::DeviceMotion(r), FieldPath::GravityZ) => float(r.gravity.z),

        (TripRecord::Device(r), FieldPath::PlatformName) => r.platform_name.clone(),
        (TripRecord::Device(r), FieldPath::OsRawName) => r.os_raw_name.clone(),
        (TripRecord::Device(r), FieldPath::OsVersion) => r.os_version.clone(),
        (TripRecord::Device(r), FieldPath::DeviceRawName) => r.device_raw_name.clone(),
        (TripRecord::Device(r), FieldPath::AppVersion) => r.app_version.clone(),
        (TripRecord::Device(r), FieldPath::AppBuildNumber) => r.app_build_number.clone(),
        (TripRecord::Device(r), FieldPath::RecordingKind) => {
            r.recording_type.map(|kind| recording_token(kind).to_string())
        }

        (TripRecord::Camera(r), FieldPath::HorizontalFov) => float(r.h_fov),
        (TripRecord::Camera(r), FieldPath::VerticalFov) => float(r.v_fov),
        (TripRecord::Camera(r), FieldPath::Aperture) => r.aperture.clone(),

        (TripRecord::Exif(r), FieldPath::FocalLength) => float(r.focal_length),
        (TripRecord::Exif(r), FieldPath::ImageWidth) => r.width.map(|v| v.to_string()),
        (TripRecord::Exif(r), FieldPath::ImageHeight) => r.height.map(|v| v.to_string()),

        _ => None,
    }
}

const fn recording_token(kind: RecordingType) -> &'static str {
    match kind {
        RecordingType::Photo => "photo",
        RecordingType::Video => "video",
        RecordingType::Raw => "raw",
        RecordingType::Unknown => "unknown",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use trip_types::{GpsRecord, RecordKind};

    #[test]
    fn serializes_absent_fields_as_empty_columns() {
        let record = TripRecord::Gps(GpsRecord {
            timestamp: Some(Timestamp::from_secs_f64(100.5)),
            latitude: Some(45.0),
            longitude: Some(10.0),
            ..GpsRecord::default()
        });
        let parser = registry::newest_parser(RecordKind::Gps).unwrap();
        assert_eq!(serialize_row(&record, parser), "45;10;;;;");
    }

    #[test]
    fn aliases_are_assigned_in_first_appearance_order() {
        let records = vec![
            TripRecord::empty(RecordKind::Compass),
            TripRecord::empty(RecordKind::Gps),
            TripRecord::empty(RecordKind::Compass),
        ];
        let bindings = alias_bindings(&records).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].0, "1");
        assert_eq!(bindings[0].1.name, "COMPASS");
        assert_eq!(bindings[1].0, "2");
        assert_eq!(bindings[1].1.name, "GPS");
    }

    #[test]
    fn recording_tokens_round_trip_through_classification() {
        for kind in [
            RecordingType::Photo,
            RecordingType::Video,
            RecordingType::Raw,
            RecordingType::Unknown,
        ] {
            assert_eq!(RecordingType::classify(recording_token(kind)), kind);
        }
    }
}
