//! Trip sensor-log record types.
//!
//! This crate provides the record model shared across the trip tooling:
//! - Log decoding (`trip-metadata` readers)
//! - Photo/frame correlation
//! - Upload and EXIF tagging pipelines
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no I/O and no parsing logic. It can be used
//! in CLI tools, servers and WASM. Serialization is opt-in behind the
//! `serde` feature.
//!
//! # Record Types
//!
//! - [`PhotoFrame`] - One photo or video frame with sensor snapshots
//! - [`GpsRecord`] - Position fix with accuracy and speed
//! - [`Acceleration`] / [`Gravity`] / [`Attitude`] - Motion readings
//! - [`DeviceMotion`] - Fused motion sample (gyroscope + acceleration + gravity)
//! - [`Compass`] / [`Obd`] / [`Pressure`] - Scalar sensor readings
//! - [`DeviceIdentity`] - Capture device, OS and app identity
//! - [`CameraParameters`] / [`ExifParameters`] - Optics metadata
//! - [`TripRecord`] - Sum of all of the above, tagged by [`RecordKind`]
//!
//! # Absence
//!
//! Every field a log may omit is an `Option`; an absent reading is never
//! conflated with a zero reading. Decoders fill fields one at a time, so
//! all record types implement `Default` with everything absent.
//!
//! # Time
//!
//! All records carry an optional [`Timestamp`], UNIX seconds with
//! sub-millisecond precision, enabling ordered merging and photo
//! correlation in `trip-metadata`.
//!
//! # Example
//!
//! ```
//! use trip_types::{GpsRecord, Timestamp};
//!
//! let gps = GpsRecord {
//!     timestamp: Some(Timestamp::from_secs_f64(1471117570.183)),
//!     latitude: Some(45.657),
//!     longitude: Some(25.601),
//!     ..GpsRecord::default()
//! };
//!
//! assert!(gps.has_fix());
//! assert!(gps.speed_kmh().is_none());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod camera;
mod compass;
mod device;
mod error;
mod gps;
mod motion;
mod obd;
mod photo;
mod pressure;
mod record;
mod time;
pub mod units;

// Re-export core types
pub use camera::{CameraParameters, CameraProjection, ExifParameters};
pub use compass::Compass;
pub use device::{DeviceIdentity, Platform, RecordingType};
pub use error::RecordError;
pub use gps::GpsRecord;
pub use motion::{Acceleration, Attitude, DeviceMotion, Gravity};
pub use obd::Obd;
pub use photo::PhotoFrame;
pub use pressure::Pressure;
pub use record::{RecordKind, SensorRecord, TripRecord};
pub use time::Timestamp;
