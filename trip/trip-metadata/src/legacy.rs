//! Legacy fixed-column log reading.
//!
//! Pre-2.0 logs carry no header: the first line is a device/version
//! summary and every following line is a semicolon-delimited sensor row
//! whose column meaning depends on the detected version tag. Rows carry
//! no type tag either; a row's meaning is inferred from which optional
//! columns are populated, through an ordered list of matchers where the
//! first structural match wins.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use trip_types::{
    Acceleration, Attitude, Compass, DeviceIdentity, DeviceMotion, GpsRecord, Gravity, Obd,
    PhotoFrame, Platform, Pressure, RecordKind, RecordingType, Timestamp, TripRecord,
};

use crate::correlate::{self, Correlator};
use crate::decode::{parse_f64, parse_legacy_timestamp, parse_u64};
use crate::registry::{self, ColumnLayout};
use crate::{FieldPath, MetadataError, VersionTag};

/// One waylens-family firmware build logged GPS speed pre-multiplied by
/// 3.6; the historic decoder divides it back out. Vendor-specific patch,
/// applied to legacy GPS rows only and never generalized.
fn waylens_speed_fix(device: &DeviceIdentity, speed: f64) -> f64 {
    if device.device_name_contains("waylens") {
        speed / 3.6
    } else {
        speed
    }
}

/// Detected per-log state: version, resolved layout and device identity.
#[derive(Debug)]
struct LegacyState {
    version: VersionTag,
    layout: &'static ColumnLayout,
    device: DeviceIdentity,
    body_offset: u64,
}

/// A reader over one legacy log file.
///
/// Layout detection is lazy: the first decode request reads the summary
/// line, classifies the device and resolves the column layout. The reader
/// owns its cursor exclusively; it must not be shared across callers.
#[derive(Debug)]
pub struct LegacyReader {
    path: PathBuf,
    state: Option<LegacyState>,
    cursor: u64,
    correlator: Correlator,
}

impl LegacyReader {
    /// Creates a reader for `path`. No I/O happens until the first
    /// operation.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: None,
            cursor: 0,
            correlator: Correlator::new(),
        }
    }

    /// Resets the cursor to the start of the body and clears the
    /// aggregation state of the incremental scan.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Structural`] when the summary line is
    /// unrecognized, or [`MetadataError::Io`] when the file is unreadable.
    pub fn start_new_reading(&mut self) -> Result<(), MetadataError> {
        self.cursor = self.ensure_detected()?.body_offset;
        self.correlator = Correlator::new();
        Ok(())
    }

    /// Scans forward from the cursor to the next record of `kind`.
    ///
    /// The cursor advances past every consumed line, matching or not, so
    /// repeated calls make monotonic progress. Every classified row feeds
    /// the reader's aggregation state, so a photo frame comes back
    /// stamped with the last position, diagnostics and compass readings
    /// observed since the reading started. `Ok(None)` means end-of-file,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Structural and I/O failures abort; row-scoped failures skip the
    /// row and continue.
    pub fn next_of_type(&mut self, kind: RecordKind) -> Result<Option<TripRecord>, MetadataError> {
        self.ensure_detected()?;
        let mut reader = self.open_at(self.cursor)?;
        let mut line = String::new();
        loop {
            line.clear();
            let consumed = reader.read_line(&mut line)?;
            if consumed == 0 {
                return Ok(None);
            }
            self.cursor += consumed as u64;
            match self.classify_line(&line) {
                Ok(Some(record)) => {
                    let record = self.aggregate(record);
                    if record.kind() == kind {
                        return Ok(Some(record));
                    }
                }
                Ok(None) => {}
                Err(err) if err.is_row_scoped() => {
                    warn!(error = %err, "skipping undecodable legacy row");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Scans forward from the cursor to the next classifiable record of
    /// any kind. Photo frames come back stamped, as in
    /// [`LegacyReader::next_of_type`].
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`LegacyReader::next_of_type`].
    pub fn next_record(&mut self) -> Result<Option<TripRecord>, MetadataError> {
        self.ensure_detected()?;
        let mut reader = self.open_at(self.cursor)?;
        let mut line = String::new();
        loop {
            line.clear();
            let consumed = reader.read_line(&mut line)?;
            if consumed == 0 {
                return Ok(None);
            }
            self.cursor += consumed as u64;
            match self.classify_line(&line) {
                Ok(Some(record)) => return Ok(Some(self.aggregate(record))),
                Ok(None) => {}
                Err(err) if err.is_row_scoped() => {
                    warn!(error = %err, "skipping undecodable legacy row");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Feeds one consumed record through the incremental aggregation
    /// state, replacing photo frames with their stamped form.
    fn aggregate(&mut self, record: TripRecord) -> TripRecord {
        match self.correlator.observe(&record) {
            Some(stamped) => TripRecord::Photo(stamped),
            None => record,
        }
    }

    /// Decodes every record of `kind`, in file order, without touching
    /// the incremental cursor. Calling this twice returns identical
    /// sequences.
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`LegacyReader::next_of_type`].
    pub fn all_of_type(&mut self, kind: RecordKind) -> Result<Vec<TripRecord>, MetadataError> {
        Ok(self
            .scan_all()?
            .into_iter()
            .filter(|record| record.kind() == kind)
            .collect())
    }

    /// Every record in the log, sorted by timestamp, with photo frames
    /// already stamped with the last observed position, diagnostics and
    /// compass readings.
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`LegacyReader::next_of_type`].
    pub fn all_records(&mut self) -> Result<Vec<TripRecord>, MetadataError> {
        let mut records = self.scan_all()?;
        sort_by_timestamp(&mut records);
        correlate::stamp_in_stream(&mut records);
        Ok(records)
    }

    /// The correlated photo frames of the log, in capture order.
    ///
    /// A photo logged before any position row is returned with its
    /// position absent, never dropped.
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`LegacyReader::next_of_type`].
    pub fn photos(&mut self) -> Result<Vec<PhotoFrame>, MetadataError> {
        let mut records = self.scan_all()?;
        sort_by_timestamp(&mut records);
        Ok(correlate::correlate_photos(&records, None))
    }

    /// The device identity reconstructed from the summary line.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Structural`] when the summary line is
    /// unrecognized.
    pub fn device(&mut self) -> Result<DeviceIdentity, MetadataError> {
        Ok(self.ensure_detected()?.device.clone())
    }

    /// The detected legacy version tag.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Structural`] when the summary line is
    /// unrecognized.
    pub fn format_version(&mut self) -> Result<VersionTag, MetadataError> {
        Ok(self.ensure_detected()?.version)
    }

    /// The recording type of the log, from the summary line or the
    /// historic version table. `1.1.6` logs report `None`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Structural`] when the summary line is
    /// unrecognized.
    pub fn recording_type(&mut self) -> Result<Option<RecordingType>, MetadataError> {
        Ok(self.ensure_detected()?.device.recording_type)
    }

    fn open_at(&self, offset: u64) -> Result<BufReader<File>, MetadataError> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(offset))?;
        Ok(reader)
    }

    fn ensure_detected(&mut self) -> Result<&LegacyState, MetadataError> {
        if self.state.is_none() {
            let mut reader = self.open_at(0)?;
            let mut summary = String::new();
            let consumed = reader.read_line(&mut summary)?;
            if consumed == 0 {
                return Err(MetadataError::structural("empty legacy log"));
            }
            let (version, device) = parse_summary(summary.trim_end())?;
            let layout = registry::legacy_layout(&version).ok_or_else(|| {
                MetadataError::structural(format!("no layout registered for version {version}"))
            })?;
            debug!(%version, device = ?device.device_raw_name, "detected legacy log");
            self.state = Some(LegacyState {
                version,
                layout,
                device,
                body_offset: consumed as u64,
            });
            self.cursor = consumed as u64;
        }
        // Populated just above.
        match &self.state {
            Some(state) => Ok(state),
            None => Err(MetadataError::structural("legacy detection failed")),
        }
    }

    fn scan_all(&mut self) -> Result<Vec<TripRecord>, MetadataError> {
        let body_offset = self.ensure_detected()?.body_offset;
        let mut reader = self.open_at(body_offset)?;
        let mut records = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Ok(records);
            }
            match self.classify_line(&line) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(err) if err.is_row_scoped() => {
                    warn!(error = %err, "skipping undecodable legacy row");
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn classify_line(&self, line: &str) -> Result<Option<TripRecord>, MetadataError> {
        let Some(state) = &self.state else {
            return Err(MetadataError::structural("legacy layout not detected"));
        };
        let trimmed = line.trim_end();
        if !trimmed.contains(';') {
            return Ok(None);
        }
        let row = LegacyRow {
            layout: state.layout,
            columns: trimmed.split(';').collect(),
        };
        classify_row(&row, &state.device)
    }
}

fn sort_by_timestamp(records: &mut [TripRecord]) {
    use trip_types::SensorRecord;
    records.sort_by(|a, b| {
        let key = |record: &TripRecord| {
            record
                .timestamp()
                .map_or(f64::NEG_INFINITY, |ts| ts.as_secs_f64())
        };
        key(a).total_cmp(&key(b))
    });
}

/// Parses the first-line device/version summary.
///
/// Semicolon form, by era: `device;os_version;version`, plus optional
/// `app_version` and `recording_type` fields. Space form with two fields
/// is the unversioned photo era. Anything else fails closed.
fn parse_summary(line: &str) -> Result<(VersionTag, DeviceIdentity), MetadataError> {
    let mut device = DeviceIdentity::default();
    let version: VersionTag;

    if line.contains(';') {
        let elements: Vec<&str> = line.split(';').collect();
        if elements.len() < 3 || elements.len() > 6 {
            return Err(MetadataError::structural(format!(
                "unrecognized device summary: {line:?}"
            )));
        }
        device.device_raw_name = Some(elements[0].to_string());
        device.os_version = Some(elements[1].to_string());
        version = elements[2].parse()?;
        if let Some(app_version) = elements.get(3) {
            device.app_version = Some((*app_version).to_string());
        }
        if let Some(token) = elements.get(4) {
            device.recording_type = Some(RecordingType::from_token(token)?);
        }
    } else if line.contains(' ') {
        let elements: Vec<&str> = line.split(' ').collect();
        if elements.len() != 2 {
            return Err(MetadataError::structural(format!(
                "unrecognized device summary: {line:?}"
            )));
        }
        version = VersionTag::Unversioned;
        device.device_raw_name = Some(elements[0].to_string());
        device.recording_type = Some(RecordingType::Photo);
    } else {
        return Err(MetadataError::structural(format!(
            "unrecognized device summary: {line:?}"
        )));
    }

    if device.recording_type.is_none() {
        device.recording_type = registry::legacy_recording_type(&version);
    }
    if let Some(name) = device.device_raw_name.as_deref() {
        device.platform_name = Some(Platform::from_device_name(name).name().to_string());
    }
    Ok((version, device))
}

/// One raw body row resolved against the detected layout.
struct LegacyRow<'a> {
    layout: &'static ColumnLayout,
    columns: Vec<&'a str>,
}

impl LegacyRow<'_> {
    /// The raw value at `path`'s column: `None` when the layout does not
    /// map the path, the column is past the row's width, or it is empty.
    fn value(&self, path: FieldPath) -> Option<&str> {
        let column = self.layout.column(path)?;
        match self.columns.get(column) {
            Some(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    fn f64_at(&self, path: FieldPath) -> Result<Option<f64>, MetadataError> {
        self.value(path).map(|raw| parse_f64(path, raw)).transpose()
    }

    fn index_at(&self, path: FieldPath) -> Result<Option<u64>, MetadataError> {
        self.value(path).map(|raw| parse_u64(path, raw)).transpose()
    }

    fn timestamp(&self) -> Result<Option<Timestamp>, MetadataError> {
        self.value(FieldPath::Time)
            .map(parse_legacy_timestamp)
            .transpose()
    }
}

/// Classifies one body row through the matcher priority order. Several
/// matchers can structurally fit the same row; the order is semantically
/// load-bearing and must not change. Sensor matchers require the time
/// column, as the historic decoders did; a sensor row without one never
/// classifies.
fn classify_row(
    row: &LegacyRow<'_>,
    device: &DeviceIdentity,
) -> Result<Option<TripRecord>, MetadataError> {
    if let Some(photo) = match_photo(row)? {
        return Ok(Some(TripRecord::Photo(photo)));
    }
    if let Some(motion) = match_device_motion(row)? {
        return Ok(Some(motion));
    }
    if let Some(gps) = match_gps(row, device)? {
        return Ok(Some(TripRecord::Gps(gps)));
    }
    if let Some(obd) = match_obd(row)? {
        return Ok(Some(TripRecord::Obd(obd)));
    }
    if let Some(pressure) = match_pressure(row)? {
        return Ok(Some(TripRecord::Pressure(pressure)));
    }
    if let Some(compass) = match_compass(row)? {
        return Ok(Some(TripRecord::Compass(compass)));
    }
    Ok(None)
}

/// Photo-era layouts log a bare sequence index; video-era layouts log a
/// video/frame index pair.
fn match_photo(row: &LegacyRow<'_>) -> Result<Option<PhotoFrame>, MetadataError> {
    let mut photo = PhotoFrame::default();
    if let Some(index) = row.index_at(FieldPath::PhotoIndex)? {
        photo.frame_index = Some(index);
    } else {
        let video_index = row.index_at(FieldPath::VideoIndex)?;
        let frame_index = row.index_at(FieldPath::FrameIndex)?;
        let (Some(video_index), Some(frame_index)) = (video_index, frame_index) else {
            return Ok(None);
        };
        photo.video_index = Some(video_index);
        photo.frame_index = Some(frame_index);
    }
    photo.timestamp = row.timestamp()?;
    Ok(Some(photo))
}

/// A row with all nine motion components is one fused device-motion
/// sample; partial rows fall back to the single-sensor records, in the
/// historic order.
fn match_device_motion(row: &LegacyRow<'_>) -> Result<Option<TripRecord>, MetadataError> {
    let acceleration = match_acceleration(row)?;
    let gravity = match_gravity(row)?;
    let attitude = match_attitude(row)?;
    match (acceleration, gravity, attitude) {
        (Some(acceleration), Some(gravity), Some(gyroscope)) => {
            Ok(Some(TripRecord::DeviceMotion(DeviceMotion {
                timestamp: row.timestamp()?,
                gyroscope,
                acceleration,
                gravity,
            })))
        }
        (Some(acceleration), _, _) => Ok(Some(TripRecord::Acceleration(acceleration))),
        (_, Some(gravity), _) => Ok(Some(TripRecord::Gravity(gravity))),
        (_, _, Some(attitude)) => Ok(Some(TripRecord::Attitude(attitude))),
        _ => Ok(None),
    }
}

fn match_acceleration(row: &LegacyRow<'_>) -> Result<Option<Acceleration>, MetadataError> {
    let Some(timestamp) = row.timestamp()? else {
        return Ok(None);
    };
    let x = row.f64_at(FieldPath::AccelX)?;
    let y = row.f64_at(FieldPath::AccelY)?;
    let z = row.f64_at(FieldPath::AccelZ)?;
    let (Some(x), Some(y), Some(z)) = (x, y, z) else {
        return Ok(None);
    };
    Ok(Some(Acceleration {
        timestamp: Some(timestamp),
        x: Some(x),
        y: Some(y),
        z: Some(z),
    }))
}

fn match_gravity(row: &LegacyRow<'_>) -> Result<Option<Gravity>, MetadataError> {
    let Some(timestamp) = row.timestamp()? else {
        return Ok(None);
    };
    let x = row.f64_at(FieldPath::GravityX)?;
    let y = row.f64_at(FieldPath::GravityY)?;
    let z = row.f64_at(FieldPath::GravityZ)?;
    let (Some(x), Some(y), Some(z)) = (x, y, z) else {
        return Ok(None);
    };
    Ok(Some(Gravity {
        timestamp: Some(timestamp),
        x: Some(x),
        y: Some(y),
        z: Some(z),
    }))
}

fn match_attitude(row: &LegacyRow<'_>) -> Result<Option<Attitude>, MetadataError> {
    let Some(timestamp) = row.timestamp()? else {
        return Ok(None);
    };
    let yaw = row.f64_at(FieldPath::Yaw)?;
    let pitch = row.f64_at(FieldPath::Pitch)?;
    let roll = row.f64_at(FieldPath::Roll)?;
    let (Some(yaw), Some(pitch), Some(roll)) = (yaw, pitch, roll) else {
        return Ok(None);
    };
    Ok(Some(Attitude {
        timestamp: Some(timestamp),
        yaw: Some(yaw),
        pitch: Some(pitch),
        roll: Some(roll),
    }))
}

fn match_gps(
    row: &LegacyRow<'_>,
    device: &DeviceIdentity,
) -> Result<Option<GpsRecord>, MetadataError> {
    let Some(timestamp) = row.timestamp()? else {
        return Ok(None);
    };
    let latitude = row.f64_at(FieldPath::Latitude)?;
    let longitude = row.f64_at(FieldPath::Longitude)?;
    let horizontal_accuracy = row.f64_at(FieldPath::HorizontalAccuracy)?;
    let (Some(latitude), Some(longitude), Some(horizontal_accuracy)) =
        (latitude, longitude, horizontal_accuracy)
    else {
        return Ok(None);
    };
    Ok(Some(GpsRecord {
        timestamp: Some(timestamp),
        latitude: Some(latitude),
        longitude: Some(longitude),
        altitude: row.f64_at(FieldPath::Altitude)?,
        horizontal_accuracy: Some(horizontal_accuracy),
        vertical_accuracy: row.f64_at(FieldPath::VerticalAccuracy)?,
        speed: row
            .f64_at(FieldPath::GpsSpeed)?
            .map(|speed| waylens_speed_fix(device, speed)),
    }))
}

fn match_obd(row: &LegacyRow<'_>) -> Result<Option<Obd>, MetadataError> {
    let Some(timestamp) = row.timestamp()? else {
        return Ok(None);
    };
    let Some(speed) = row.f64_at(FieldPath::ObdSpeed)? else {
        return Ok(None);
    };
    Ok(Some(Obd {
        timestamp: Some(timestamp),
        speed: Some(speed),
    }))
}

fn match_pressure(row: &LegacyRow<'_>) -> Result<Option<Pressure>, MetadataError> {
    let Some(timestamp) = row.timestamp()? else {
        return Ok(None);
    };
    let Some(pressure) = row.f64_at(FieldPath::Pressure)? else {
        return Ok(None);
    };
    Ok(Some(Pressure {
        timestamp: Some(timestamp),
        pressure: Some(pressure),
    }))
}

fn match_compass(row: &LegacyRow<'_>) -> Result<Option<Compass>, MetadataError> {
    let Some(timestamp) = row.timestamp()? else {
        return Ok(None);
    };
    let Some(heading) = row.f64_at(FieldPath::Heading)? else {
        return Ok(None);
    };
    Ok(Some(Compass {
        timestamp: Some(timestamp),
        heading: Some(heading),
    }))
}
