//! Writer/reader round trips over the current format.

#![allow(clippy::unwrap_used)]

use tempfile::TempDir;
use trip_metadata::{write_current_log, MetadataLog, FORMAT_MARKER};
use trip_types::{
    Acceleration, CameraParameters, Compass, DeviceIdentity, DeviceMotion, ExifParameters,
    GpsRecord, Obd, PhotoFrame, Pressure, RecordKind, RecordingType, Timestamp, TripRecord,
};

fn ts(secs: f64) -> Option<Timestamp> {
    Some(Timestamp::from_secs_f64(secs))
}

/// One record of every kind the writer can declare, already in timestamp
/// order, populated only on fields the wire layouts carry.
fn sample_records() -> Vec<TripRecord> {
    let mut motion = DeviceMotion {
        timestamp: ts(5.0),
        ..DeviceMotion::default()
    };
    motion.gyroscope.yaw = Some(0.1);
    motion.gyroscope.pitch = Some(0.2);
    motion.gyroscope.roll = Some(0.3);
    motion.acceleration.x = Some(0.01);
    motion.acceleration.y = Some(0.02);
    motion.acceleration.z = Some(0.98);
    motion.gravity.x = Some(0.0);
    motion.gravity.y = Some(0.0);
    motion.gravity.z = Some(1.0);

    let mut photo = PhotoFrame {
        timestamp: ts(8.0),
        video_index: Some(0),
        frame_index: Some(7),
        ..PhotoFrame::default()
    };
    photo.gps.timestamp = ts(7.9);
    photo.gps.latitude = Some(45.5);
    photo.gps.longitude = Some(25.5);
    photo.gps.horizontal_accuracy = Some(4.5);
    photo.gps.speed = Some(13.5);
    photo.compass.timestamp = ts(7.8);
    photo.compass.heading = Some(270.5);
    photo.obd.timestamp = ts(7.7);
    photo.obd.speed = Some(48.5);

    vec![
        TripRecord::Device(DeviceIdentity {
            timestamp: ts(1.0),
            platform_name: Some("iOS".to_string()),
            os_raw_name: Some("iOS".to_string()),
            os_version: Some("13.2".to_string()),
            device_raw_name: Some("iPhone10,3".to_string()),
            app_version: Some("2.4.1".to_string()),
            app_build_number: Some("220".to_string()),
            recording_type: Some(RecordingType::Photo),
        }),
        TripRecord::Camera(CameraParameters {
            timestamp: ts(2.0),
            h_fov: Some(62.2),
            v_fov: Some(48.8),
            aperture: Some("f/1.8".to_string()),
            projection: None,
        }),
        TripRecord::Exif(ExifParameters {
            timestamp: ts(3.0),
            focal_length: Some(4.25),
            width: Some(4032),
            height: Some(3024),
        }),
        TripRecord::Gps(GpsRecord {
            timestamp: ts(4.0),
            latitude: Some(45.5),
            longitude: Some(25.5),
            altitude: Some(320.5),
            horizontal_accuracy: Some(4.5),
            vertical_accuracy: Some(3.5),
            speed: Some(13.5),
        }),
        TripRecord::DeviceMotion(motion),
        TripRecord::Obd(Obd {
            timestamp: ts(6.0),
            speed: Some(48.5),
        }),
        TripRecord::Compass(Compass {
            timestamp: ts(6.5),
            heading: Some(271.5),
        }),
        TripRecord::Pressure(Pressure {
            timestamp: ts(7.0),
            pressure: Some(101.3),
        }),
        TripRecord::Photo(photo),
        TripRecord::Acceleration(Acceleration {
            timestamp: ts(9.0),
            x: Some(0.03),
            y: Some(0.04),
            z: Some(0.97),
        }),
    ]
}

#[test]
fn written_log_reads_back_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trip.txt");
    let records = sample_records();

    write_current_log(&path, &records).unwrap();

    let mut log = MetadataLog::open(&path).unwrap();
    assert!(matches!(log, MetadataLog::Current(_)));
    let read_back = log.all_records().unwrap();
    assert_eq!(read_back, records);
}

#[test]
fn written_log_starts_with_format_marker() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trip.txt");
    write_current_log(&path, &sample_records()).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some(FORMAT_MARKER));
    assert_eq!(lines.next(), Some("HEADER"));
    assert_eq!(contents.lines().last(), Some("END"));
}

#[test]
fn writer_sorts_records_by_timestamp() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trip.txt");
    let records = vec![
        TripRecord::Gps(GpsRecord {
            timestamp: ts(9.0),
            latitude: Some(45.1),
            ..GpsRecord::default()
        }),
        TripRecord::Gps(GpsRecord {
            timestamp: ts(1.0),
            latitude: Some(45.0),
            ..GpsRecord::default()
        }),
    ];
    write_current_log(&path, &records).unwrap();

    let mut log = MetadataLog::open(&path).unwrap();
    let read_back = log.all_of_type(RecordKind::Gps).unwrap();
    assert_eq!(read_back[0].as_gps().unwrap().latitude, Some(45.0));
    assert_eq!(read_back[1].as_gps().unwrap().latitude, Some(45.1));
}

#[test]
fn photos_survive_the_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trip.txt");
    let records = sample_records();
    write_current_log(&path, &records).unwrap();

    let mut log = MetadataLog::open(&path).unwrap();
    let photos = log.photos().unwrap();
    assert_eq!(photos.len(), 1);
    let original = records
        .iter()
        .find_map(|record| record.as_photo())
        .unwrap();
    assert!(photos[0].same_frame(original));
    assert_eq!(photos[0].obd.speed, original.obd.speed);
    assert_eq!(photos[0].compass.heading, original.compass.heading);
}

#[test]
fn device_identity_survives_the_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trip.txt");
    write_current_log(&path, &sample_records()).unwrap();

    let mut log = MetadataLog::open(&path).unwrap();
    let device = log.device().unwrap();
    assert_eq!(device.device_raw_name.as_deref(), Some("iPhone10,3"));
    assert_eq!(device.recording_type, Some(RecordingType::Photo));
    assert_eq!(log.recording_type().unwrap(), Some(RecordingType::Photo));
}

#[test]
fn empty_record_set_writes_a_valid_log() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trip.txt");
    write_current_log(&path, &[]).unwrap();

    let mut log = MetadataLog::open(&path).unwrap();
    assert!(log.all_records().unwrap().is_empty());
    assert!(log.photos().unwrap().is_empty());
}
