//! Stream readers over trip log files.
//!
//! [`MetadataLog::open`] inspects the first line and picks the reader:
//! the `METADATA:2.0` marker selects the self-describing current format,
//! anything else falls back to legacy fixed-column detection. Both
//! readers keep two byte offsets, the body start and a read cursor, both
//! always at line boundaries, so the same log can be re-scanned for
//! different record types without re-parsing the header.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use trip_types::{DeviceIdentity, PhotoFrame, RecordKind, RecordingType, Timestamp, TripRecord};

use crate::decode;
use crate::legacy::LegacyReader;
use crate::registry::{self, RowParser};
use crate::{MetadataError, VersionTag};

/// First-line marker of the current self-describing format.
pub const FORMAT_MARKER: &str = "METADATA:2.0";

const HEADER_MARKER: &str = "HEADER";
const BODY_MARKER: &str = "BODY";
const END_MARKER: &str = "END";
const ALIAS_PREFIX: &str = "ALIAS:";

/// One header declaration: an alias bound to its compatible parsers.
#[derive(Debug, Clone)]
struct AliasBinding {
    alias: String,
    parsers: Vec<&'static RowParser>,
}

impl AliasBinding {
    /// The parser used for this alias' rows: the first compatible one in
    /// registration order.
    fn parser(&self) -> &'static RowParser {
        self.parsers[0]
    }
}

/// A reader over one current-format log file.
///
/// The header is parsed once at open; body rows are decoded on demand.
/// The reader owns its cursor exclusively and must not be driven by more
/// than one caller at a time.
#[derive(Debug)]
pub struct CurrentReader {
    path: PathBuf,
    bindings: Vec<AliasBinding>,
    body_offset: u64,
    cursor: u64,
    device: Option<DeviceIdentity>,
}

impl CurrentReader {
    /// Opens a current-format log and parses its header.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Structural`] when the format marker,
    /// `HEADER` section or `BODY` marker is missing, when an alias line
    /// is malformed, or when an alias has zero compatible registered
    /// parsers. Fails closed: no records are ever produced from a log
    /// whose header cannot be trusted.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let path = path.as_ref().to_path_buf();
        let mut reader = BufReader::new(File::open(&path)?);
        let mut offset = 0u64;
        let mut line = String::new();

        let mut next_line =
            |reader: &mut BufReader<File>, line: &mut String| -> Result<bool, MetadataError> {
                line.clear();
                let consumed = reader.read_line(line)?;
                offset += consumed as u64;
                Ok(consumed > 0)
            };

        if !next_line(&mut reader, &mut line)? || line.trim_end() != FORMAT_MARKER {
            return Err(MetadataError::structural(format!(
                "missing {FORMAT_MARKER} marker"
            )));
        }
        if !next_line(&mut reader, &mut line)? || line.trim_end() != HEADER_MARKER {
            return Err(MetadataError::structural("missing HEADER section"));
        }

        let mut bindings = Vec::new();
        loop {
            if !next_line(&mut reader, &mut line)? {
                return Err(MetadataError::structural("missing BODY marker"));
            }
            let trimmed = line.trim_end();
            if trimmed == BODY_MARKER {
                break;
            }
            bindings.push(parse_alias_line(trimmed)?);
        }

        debug!(path = %path.display(), aliases = bindings.len(), "opened current-format log");
        Ok(Self {
            path,
            bindings,
            body_offset: offset,
            cursor: offset,
            device: None,
        })
    }

    /// Resets the cursor to the start of the body.
    pub fn start_new_reading(&mut self) {
        self.cursor = self.body_offset;
    }

    /// Scans forward from the cursor to the next record of `kind`.
    ///
    /// The cursor advances past every consumed line, matching or not, so
    /// repeated calls make monotonic progress. Stops at the `END` marker;
    /// `Ok(None)` is a normal empty result.
    ///
    /// # Errors
    ///
    /// I/O failures abort; row-scoped failures skip the row and continue.
    pub fn next_of_type(&mut self, kind: RecordKind) -> Result<Option<TripRecord>, MetadataError> {
        let mut reader = self.open_at(self.cursor)?;
        let mut line = String::new();
        loop {
            line.clear();
            let consumed = reader.read_line(&mut line)?;
            if consumed == 0 || line.trim_end() == END_MARKER {
                return Ok(None);
            }
            self.cursor += consumed as u64;
            match self.decode_line(line.trim_end(), Some(kind)) {
                Ok(Some(record)) => return Ok(Some(record)),
                Ok(None) => {}
                Err(err) if err.is_row_scoped() => {
                    warn!(error = %err, "skipping undecodable row");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// The next decodable record of any declared type.
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`CurrentReader::next_of_type`].
    pub fn next_record(&mut self) -> Result<Option<TripRecord>, MetadataError> {
        let mut reader = self.open_at(self.cursor)?;
        let mut line = String::new();
        loop {
            line.clear();
            let consumed = reader.read_line(&mut line)?;
            if consumed == 0 || line.trim_end() == END_MARKER {
                return Ok(None);
            }
            self.cursor += consumed as u64;
            match self.decode_line(line.trim_end(), None) {
                Ok(Some(record)) => return Ok(Some(record)),
                Ok(None) => {}
                Err(err) if err.is_row_scoped() => {
                    warn!(error = %err, "skipping undecodable row");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Decodes every record of `kind`, in file order, without touching
    /// the incremental cursor. Calling this twice returns identical
    /// sequences.
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`CurrentReader::next_of_type`].
    pub fn all_of_type(&self, kind: RecordKind) -> Result<Vec<TripRecord>, MetadataError> {
        self.scan(Some(kind))
    }

    /// Every decodable record, in file order.
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`CurrentReader::next_of_type`].
    pub fn all_records(&self) -> Result<Vec<TripRecord>, MetadataError> {
        self.scan(None)
    }

    /// The correlated photo frames of the log. Current-format photo rows
    /// are pre-joined, so this is a plain extraction.
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`CurrentReader::next_of_type`].
    pub fn photos(&self) -> Result<Vec<PhotoFrame>, MetadataError> {
        Ok(self
            .all_of_type(RecordKind::Photo)?
            .into_iter()
            .filter_map(TripRecord::into_photo)
            .collect())
    }

    /// The format version of the log.
    #[must_use]
    pub const fn format_version(&self) -> VersionTag {
        VersionTag::CURRENT
    }

    /// The first DEVICE record of the log, cached after the first read.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Registry`] when the log declares no
    /// DEVICE alias or contains no DEVICE row.
    pub fn device(&mut self) -> Result<DeviceIdentity, MetadataError> {
        if let Some(device) = &self.device {
            return Ok(device.clone());
        }
        let device = self
            .all_of_type(RecordKind::Device)?
            .into_iter()
            .find_map(|record| match record {
                TripRecord::Device(device) => Some(device),
                _ => None,
            })
            .ok_or_else(|| MetadataError::registry("log contains no DEVICE record"))?;
        self.device = Some(device.clone());
        Ok(device)
    }

    /// The recording type declared by the log's DEVICE record.
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`CurrentReader::device`].
    pub fn recording_type(&mut self) -> Result<Option<RecordingType>, MetadataError> {
        Ok(self.device()?.recording_type)
    }

    fn open_at(&self, offset: u64) -> Result<BufReader<File>, MetadataError> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(offset))?;
        Ok(reader)
    }

    fn scan(&self, kind: Option<RecordKind>) -> Result<Vec<TripRecord>, MetadataError> {
        let mut reader = self.open_at(self.body_offset)?;
        let mut records = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            let consumed = reader.read_line(&mut line)?;
            if consumed == 0 || line.trim_end() == END_MARKER {
                return Ok(records);
            }
            match self.decode_line(line.trim_end(), kind) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(err) if err.is_row_scoped() => {
                    warn!(error = %err, "skipping undecodable row");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Decodes one body row, returning `Ok(None)` for rows bound to a
    /// different kind or an undeclared alias.
    fn decode_line(
        &self,
        row: &str,
        kind: Option<RecordKind>,
    ) -> Result<Option<TripRecord>, MetadataError> {
        let mut parts = row.splitn(3, ':');
        let (Some(timestamp), Some(alias), Some(data)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(MetadataError::row_decode(format!(
                "row is not timestamp:alias:data shaped: {row:?}"
            )));
        };
        let Some(binding) = self.bindings.iter().find(|b| b.alias == alias) else {
            debug!(alias, "row uses undeclared alias");
            return Ok(None);
        };
        let parser = binding.parser();
        if kind.is_some_and(|kind| parser.kind != kind) {
            return Ok(None);
        }
        let timestamp = decode::parse_f64(crate::FieldPath::Time, timestamp)
            .map(Timestamp::from_secs_f64)?;
        decode::decode_current_row(parser, timestamp, data).map(Some)
    }
}

fn parse_alias_line(line: &str) -> Result<AliasBinding, MetadataError> {
    let Some(declaration) = line.strip_prefix(ALIAS_PREFIX) else {
        return Err(MetadataError::structural(format!(
            "header line is not an alias declaration: {line:?}"
        )));
    };
    let elements: Vec<&str> = declaration.split(';').collect();
    let [alias, name, version, min_version] = elements[..] else {
        return Err(MetadataError::structural(format!(
            "malformed alias declaration: {line:?}"
        )));
    };
    let parse_version = |raw: &str| {
        raw.parse::<u32>().map_err(|_| {
            MetadataError::structural(format!("non-numeric version in alias declaration: {line:?}"))
        })
    };
    let declared = parse_version(version)?;
    let min = parse_version(min_version)?;
    if declared < min {
        return Err(MetadataError::structural(format!(
            "alias declares version {declared} below its own minimum {min}"
        )));
    }
    let parsers = registry::parsers_for(name, min);
    if parsers.is_empty() {
        return Err(MetadataError::structural(format!(
            "no registered parser compatible with {name} >= {min}"
        )));
    }
    Ok(AliasBinding {
        alias: alias.to_string(),
        parsers,
    })
}

/// A trip log of either format, dispatching to the matching reader.
#[derive(Debug)]
pub enum MetadataLog {
    /// Self-describing `METADATA:2.0` log.
    Current(CurrentReader),
    /// Pre-2.0 fixed-column log.
    Legacy(LegacyReader),
}

impl MetadataLog {
    /// Opens a log, inspecting the first line to pick the format.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Io`] when the file is unreadable and
    /// [`MetadataError::Structural`] when a current-format header is
    /// malformed. Legacy detection itself is lazy and surfaces its
    /// errors on the first decode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let mut first_line = String::new();
        reader.read_line(&mut first_line)?;
        if first_line.trim_end() == FORMAT_MARKER {
            Ok(Self::Current(CurrentReader::open(path)?))
        } else {
            Ok(Self::Legacy(LegacyReader::new(path)))
        }
    }

    /// Resets the cursor to the start of the body.
    ///
    /// # Errors
    ///
    /// Legacy logs may fail detection here; see [`LegacyReader`].
    pub fn start_new_reading(&mut self) -> Result<(), MetadataError> {
        match self {
            Self::Current(reader) => {
                reader.start_new_reading();
                Ok(())
            }
            Self::Legacy(reader) => reader.start_new_reading(),
        }
    }

    /// Scans forward from the cursor to the next record of `kind`.
    ///
    /// # Errors
    ///
    /// See [`CurrentReader::next_of_type`] and [`LegacyReader::next_of_type`].
    pub fn next_of_type(&mut self, kind: RecordKind) -> Result<Option<TripRecord>, MetadataError> {
        match self {
            Self::Current(reader) => reader.next_of_type(kind),
            Self::Legacy(reader) => reader.next_of_type(kind),
        }
    }

    /// Scans forward from the cursor to the next decodable record of any
    /// kind.
    ///
    /// # Errors
    ///
    /// See [`CurrentReader::next_record`] and [`LegacyReader::next_record`].
    pub fn next_record(&mut self) -> Result<Option<TripRecord>, MetadataError> {
        match self {
            Self::Current(reader) => reader.next_record(),
            Self::Legacy(reader) => reader.next_record(),
        }
    }

    /// Decodes every record of `kind` without touching the cursor.
    ///
    /// # Errors
    ///
    /// See [`CurrentReader::all_of_type`] and [`LegacyReader::all_of_type`].
    pub fn all_of_type(&mut self, kind: RecordKind) -> Result<Vec<TripRecord>, MetadataError> {
        match self {
            Self::Current(reader) => reader.all_of_type(kind),
            Self::Legacy(reader) => reader.all_of_type(kind),
        }
    }

    /// Every record of the log. Legacy records come back sorted by
    /// timestamp with photos already aggregated.
    ///
    /// # Errors
    ///
    /// See [`CurrentReader::all_records`] and [`LegacyReader::all_records`].
    pub fn all_records(&mut self) -> Result<Vec<TripRecord>, MetadataError> {
        match self {
            Self::Current(reader) => reader.all_records(),
            Self::Legacy(reader) => reader.all_records(),
        }
    }

    /// The correlated photo frames of the log.
    ///
    /// # Errors
    ///
    /// See [`CurrentReader::photos`] and [`LegacyReader::photos`].
    pub fn photos(&mut self) -> Result<Vec<PhotoFrame>, MetadataError> {
        match self {
            Self::Current(reader) => reader.photos(),
            Self::Legacy(reader) => reader.photos(),
        }
    }

    /// The log's format version.
    ///
    /// # Errors
    ///
    /// Legacy logs may fail detection here; see [`LegacyReader`].
    pub fn format_version(&mut self) -> Result<VersionTag, MetadataError> {
        match self {
            Self::Current(reader) => Ok(reader.format_version()),
            Self::Legacy(reader) => reader.format_version(),
        }
    }

    /// The identity of the device that produced the log.
    ///
    /// # Errors
    ///
    /// See [`CurrentReader::device`] and [`LegacyReader::device`].
    pub fn device(&mut self) -> Result<DeviceIdentity, MetadataError> {
        match self {
            Self::Current(reader) => reader.device(),
            Self::Legacy(reader) => reader.device(),
        }
    }

    /// The recording type of the log, when declared.
    ///
    /// # Errors
    ///
    /// See [`CurrentReader::recording_type`] and
    /// [`LegacyReader::recording_type`].
    pub fn recording_type(&mut self) -> Result<Option<RecordingType>, MetadataError> {
        match self {
            Self::Current(reader) => reader.recording_type(),
            Self::Legacy(reader) => reader.recording_type(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn alias_line_binds_compatible_parsers() {
        let binding = parse_alias_line("ALIAS:a;GPS;1;1").unwrap();
        assert_eq!(binding.alias, "a");
        assert_eq!(binding.parser().name, "GPS");
        assert_eq!(binding.parser().version, 1);
    }

    #[test]
    fn alias_min_version_picks_lowest_compatible() {
        let binding = parse_alias_line("ALIAS:c;CAMERA;2;1").unwrap();
        assert_eq!(binding.parsers.len(), 2);
        assert_eq!(binding.parser().version, 1);

        let binding = parse_alias_line("ALIAS:c;CAMERA;2;2").unwrap();
        assert_eq!(binding.parser().version, 2);
    }

    #[test]
    fn alias_without_compatible_parser_is_structural() {
        let err = parse_alias_line("ALIAS:x;GPS;9;9").unwrap_err();
        assert!(matches!(err, MetadataError::Structural(_)));
        let err = parse_alias_line("ALIAS:x;LIDAR;1;1").unwrap_err();
        assert!(matches!(err, MetadataError::Structural(_)));
    }

    #[test]
    fn malformed_alias_lines_rejected() {
        assert!(parse_alias_line("a;GPS;1;1").is_err());
        assert!(parse_alias_line("ALIAS:a;GPS;1").is_err());
        assert!(parse_alias_line("ALIAS:a;GPS;one;1").is_err());
        assert!(parse_alias_line("ALIAS:a;GPS;1;2").is_err());
    }
}
