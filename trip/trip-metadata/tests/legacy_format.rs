//! End-to-end tests over legacy fixed-column log files.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use trip_metadata::{MetadataError, MetadataLog, VersionTag};
use trip_types::{RecordKind, RecordingType, SensorRecord, TripRecord};

const SUMMARY_1_0_6: &str = "iPhone10,3;13.2;1.0.6;2.4";

/// Builds one 1.0.6 body row (19 columns) with the given columns set.
fn row(fields: &[(usize, &str)]) -> String {
    let mut columns = vec![String::new(); 19];
    for &(index, value) in fields {
        columns[index] = value.to_string();
    }
    columns.join(";")
}

fn write_log(dir: &TempDir, lines: &[String]) -> PathBuf {
    let path = dir.path().join("track.txt");
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(&path, contents).unwrap();
    path
}

// Column indices of the 1.0.6 layout.
const TIME: usize = 0;
const LONGITUDE: usize = 1;
const LATITUDE: usize = 2;
const ALTITUDE: usize = 3;
const HORIZONTAL_ACCURACY: usize = 4;
const GPS_SPEED: usize = 5;
const PHOTO_INDEX: usize = 14;
const OBD_SPEED: usize = 18;

#[test]
fn summary_line_is_classified() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, &[SUMMARY_1_0_6.to_string()]);

    let mut log = MetadataLog::open(&path).unwrap();
    assert!(matches!(log, MetadataLog::Legacy(_)));
    assert_eq!(log.format_version().unwrap(), VersionTag::three_part(1, 0, 6));
    assert_eq!(log.recording_type().unwrap(), Some(RecordingType::Photo));

    let device = log.device().unwrap();
    assert_eq!(device.platform_name.as_deref(), Some("iOS"));
    assert_eq!(device.device_raw_name.as_deref(), Some("iPhone10,3"));
    assert_eq!(device.os_version.as_deref(), Some("13.2"));
    assert_eq!(device.app_version.as_deref(), Some("2.4"));
}

#[test]
fn photos_carry_last_observed_readings() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        SUMMARY_1_0_6.to_string(),
        row(&[
            (TIME, "1.0"),
            (LONGITUDE, "25.0"),
            (LATITUDE, "45.0"),
            (HORIZONTAL_ACCURACY, "4.0"),
        ]),
        row(&[(TIME, "1.5"), (OBD_SPEED, "50.0")]),
        row(&[(TIME, "2.0"), (PHOTO_INDEX, "0")]),
        row(&[
            (TIME, "3.0"),
            (LONGITUDE, "25.1"),
            (LATITUDE, "45.1"),
            (HORIZONTAL_ACCURACY, "4.0"),
        ]),
        row(&[(TIME, "4.0"), (PHOTO_INDEX, "1")]),
    ];
    let path = write_log(&dir, &lines);

    let mut log = MetadataLog::open(&path).unwrap();
    let photos = log.photos().unwrap();
    assert_eq!(photos.len(), 2);

    assert_eq!(photos[0].frame_index, Some(0));
    assert_eq!(photos[0].gps.latitude, Some(45.0));
    assert_eq!(photos[0].obd.speed, Some(50.0));
    assert!(!photos[0].compass.has_heading());

    // The second frame sees the newer position and the same diagnostics.
    assert_eq!(photos[1].frame_index, Some(1));
    assert_eq!(photos[1].gps.latitude, Some(45.1));
    assert_eq!(photos[1].obd.speed, Some(50.0));
}

#[test]
fn photo_before_any_position_is_kept() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        SUMMARY_1_0_6.to_string(),
        row(&[(TIME, "1.0"), (PHOTO_INDEX, "0")]),
        row(&[
            (TIME, "2.0"),
            (LONGITUDE, "25.0"),
            (LATITUDE, "45.0"),
            (HORIZONTAL_ACCURACY, "4.0"),
        ]),
    ];
    let path = write_log(&dir, &lines);

    let mut log = MetadataLog::open(&path).unwrap();
    let photos = log.photos().unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].frame_index, Some(0));
    assert!(photos[0].gps.is_empty());
}

#[test]
fn all_records_are_sorted_and_photos_stamped() {
    let dir = TempDir::new().unwrap();
    // Out of timestamp order on disk.
    let lines = vec![
        SUMMARY_1_0_6.to_string(),
        row(&[(TIME, "3.0"), (PHOTO_INDEX, "0")]),
        row(&[
            (TIME, "1.0"),
            (LONGITUDE, "25.0"),
            (LATITUDE, "45.0"),
            (HORIZONTAL_ACCURACY, "4.0"),
        ]),
        row(&[(TIME, "2.0"), (OBD_SPEED, "40.0")]),
    ];
    let path = write_log(&dir, &lines);

    let mut log = MetadataLog::open(&path).unwrap();
    let records = log.all_records().unwrap();
    assert_eq!(records.len(), 3);
    let stamps: Vec<f64> = records
        .iter()
        .map(|record| record.timestamp().unwrap().as_secs_f64())
        .collect();
    assert_eq!(stamps, vec![1.0, 2.0, 3.0]);

    let TripRecord::Photo(photo) = &records[2] else {
        panic!("expected photo record last");
    };
    assert_eq!(photo.gps.latitude, Some(45.0));
    assert_eq!(photo.obd.speed, Some(40.0));
}

#[test]
fn millisecond_timestamps_are_repaired() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        SUMMARY_1_0_6.to_string(),
        row(&[
            (TIME, "1471117570183"),
            (LONGITUDE, "25.6"),
            (LATITUDE, "45.6"),
            (ALTITUDE, "320.0"),
            (HORIZONTAL_ACCURACY, "4.0"),
        ]),
    ];
    let path = write_log(&dir, &lines);

    let mut log = MetadataLog::open(&path).unwrap();
    let record = log.next_of_type(RecordKind::Gps).unwrap().unwrap();
    let gps = record.as_gps().unwrap();
    let ts = gps.timestamp.unwrap().as_secs_f64();
    assert!((ts - 1_471_117_570.183).abs() < 1e-9);
    assert_eq!(gps.altitude, Some(320.0));
}

#[test]
fn waylens_speed_is_divided_back() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        "waylens_hub;1.0;1.0.6;1.0".to_string(),
        row(&[
            (TIME, "1.0"),
            (LONGITUDE, "25.0"),
            (LATITUDE, "45.0"),
            (HORIZONTAL_ACCURACY, "4.0"),
            (GPS_SPEED, "36.0"),
        ]),
    ];
    let path = write_log(&dir, &lines);

    let mut log = MetadataLog::open(&path).unwrap();
    let record = log.next_of_type(RecordKind::Gps).unwrap().unwrap();
    assert_eq!(record.as_gps().unwrap().speed, Some(10.0));
}

#[test]
fn next_of_type_advances_while_all_of_type_does_not() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        SUMMARY_1_0_6.to_string(),
        row(&[
            (TIME, "1.0"),
            (LONGITUDE, "25.0"),
            (LATITUDE, "45.0"),
            (HORIZONTAL_ACCURACY, "4.0"),
        ]),
        row(&[
            (TIME, "2.0"),
            (LONGITUDE, "25.1"),
            (LATITUDE, "45.1"),
            (HORIZONTAL_ACCURACY, "4.0"),
        ]),
    ];
    let path = write_log(&dir, &lines);

    let mut log = MetadataLog::open(&path).unwrap();
    let first = log.next_of_type(RecordKind::Gps).unwrap().unwrap();
    assert_eq!(first.as_gps().unwrap().latitude, Some(45.0));

    assert_eq!(log.all_of_type(RecordKind::Gps).unwrap().len(), 2);

    let second = log.next_of_type(RecordKind::Gps).unwrap().unwrap();
    assert_eq!(second.as_gps().unwrap().latitude, Some(45.1));
    assert!(log.next_of_type(RecordKind::Gps).unwrap().is_none());

    log.start_new_reading().unwrap();
    let again = log.next_of_type(RecordKind::Gps).unwrap().unwrap();
    assert_eq!(again.as_gps().unwrap().latitude, Some(45.0));
}

#[test]
fn next_photo_carries_last_observed_readings() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        SUMMARY_1_0_6.to_string(),
        row(&[
            (TIME, "1.0"),
            (LONGITUDE, "25.0"),
            (LATITUDE, "45.0"),
            (HORIZONTAL_ACCURACY, "4.0"),
        ]),
        row(&[(TIME, "1.5"), (OBD_SPEED, "50.0")]),
        row(&[(TIME, "2.0"), (PHOTO_INDEX, "0")]),
    ];
    let path = write_log(&dir, &lines);

    let mut log = MetadataLog::open(&path).unwrap();
    let record = log.next_of_type(RecordKind::Photo).unwrap().unwrap();
    let photo = record.into_photo().unwrap();
    assert_eq!(photo.frame_index, Some(0));
    assert_eq!(photo.gps.latitude, Some(45.0));
    assert_eq!(photo.obd.speed, Some(50.0));
    assert!(!photo.compass.has_heading());

    // A fresh reading re-observes the same rows and stamps identically.
    log.start_new_reading().unwrap();
    let again = log.next_of_type(RecordKind::Photo).unwrap().unwrap();
    let again = again.into_photo().unwrap();
    assert_eq!(again.gps.latitude, Some(45.0));
    assert_eq!(again.obd.speed, Some(50.0));
}

#[test]
fn next_record_yields_any_kind_in_file_order() {
    let dir = TempDir::new().unwrap();
    let lines = vec![
        SUMMARY_1_0_6.to_string(),
        row(&[
            (TIME, "1.0"),
            (LONGITUDE, "25.0"),
            (LATITUDE, "45.0"),
            (HORIZONTAL_ACCURACY, "4.0"),
        ]),
        row(&[(TIME, "1.5"), (OBD_SPEED, "50.0")]),
        row(&[(TIME, "2.0"), (PHOTO_INDEX, "0")]),
    ];
    let path = write_log(&dir, &lines);

    let mut log = MetadataLog::open(&path).unwrap();
    assert!(matches!(
        log.next_record().unwrap().unwrap(),
        TripRecord::Gps(_)
    ));
    assert!(matches!(
        log.next_record().unwrap().unwrap(),
        TripRecord::Obd(_)
    ));
    let TripRecord::Photo(photo) = log.next_record().unwrap().unwrap() else {
        panic!("expected photo record");
    };
    assert_eq!(photo.gps.latitude, Some(45.0));
    assert_eq!(photo.obd.speed, Some(50.0));
    assert!(log.next_record().unwrap().is_none());
}

#[test]
fn unknown_version_fails_on_first_operation() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, &["iPhone10,3;13.2;9.9.9".to_string()]);

    // Opening only dispatches on the first line; detection is lazy.
    let mut log = MetadataLog::open(&path).unwrap();
    let err = log.photos().unwrap_err();
    assert!(matches!(err, MetadataError::Structural(_)));
}

#[test]
fn empty_log_fails_closed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("track.txt");
    fs::write(&path, "").unwrap();

    let mut log = MetadataLog::open(&path).unwrap();
    let err = log.format_version().unwrap_err();
    assert!(matches!(err, MetadataError::Structural(_)));
}
