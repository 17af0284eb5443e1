//! Trip sensor-log decoding and correlation.
//!
//! Capture devices write one metadata log per trip. Newer firmware uses a
//! self-describing text format (`METADATA:2.0`) whose header binds row
//! aliases to registered row-type parsers; sixteen older firmware
//! generations used fixed column layouts keyed by a version tag. This
//! crate reads both, through one reader surface:
//!
//! - [`MetadataLog`] - opens a log and dispatches to the right reader
//! - [`CurrentReader`] / [`LegacyReader`] - the two format strategies
//! - [`Correlator`] - stamps legacy photo frames with the last observed
//!   position, diagnostics and compass readings
//! - [`write_current_log`] - serializes records back to the 2.0 format
//!
//! # Registry
//!
//! Column layouts are static data in [`registry`]; supporting a new row
//! type version is purely additive there and never touches decoding or
//! correlation logic. Legacy layouts are reproduced bit-exact from the
//! historic firmware tables.
//!
//! # Reading model
//!
//! Readers own an exclusive cursor into one file and are strictly
//! single-threaded; run one reader per log file. The registry is
//! `'static` shared data and is safe to use from any number of threads.
//! Row-scoped decode failures skip the row (logged at `warn`);
//! structural header failures fail the whole file closed.
//!
//! # Example
//!
//! ```no_run
//! use trip_metadata::MetadataLog;
//!
//! # fn main() -> Result<(), trip_metadata::MetadataError> {
//! let mut log = MetadataLog::open("trip.txt")?;
//! for photo in log.photos()? {
//!     if photo.gps.has_fix() {
//!         println!("frame {:?} at {:?}", photo.frame_index, photo.gps.latitude);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod correlate;
mod decode;
mod error;
mod fields;
mod legacy;
mod reader;
pub mod registry;
mod version;
mod writer;

// Re-export core types
pub use correlate::{correlate_photos, Correlator};
pub use decode::{decode_current_row, parse_legacy_timestamp};
pub use error::MetadataError;
pub use fields::FieldPath;
pub use legacy::LegacyReader;
pub use reader::{CurrentReader, MetadataLog, FORMAT_MARKER};
pub use registry::{ColumnLayout, RowParser};
pub use version::VersionTag;
pub use writer::write_current_log;
