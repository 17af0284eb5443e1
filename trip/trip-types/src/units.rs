//! Speed unit conversions.
//!
//! The EXIF tag boundary expects km/h; devices log m/s, mph or knots
//! depending on firmware. Conversion happens on the decoding side of the
//! handoff, never in the tag writer.

/// Miles per hour to kilometers per hour conversion factor.
pub const MPH_TO_KMH_FACTOR: f64 = 1.60934;

/// Knots to kilometers per hour conversion factor.
pub const KNOTS_TO_KMH_FACTOR: f64 = 1.852;

/// Converts meters per second to kilometers per hour.
#[must_use]
pub fn mps_to_kmh(mps: f64) -> f64 {
    mps * 3.6
}

/// Converts miles per hour to kilometers per hour.
#[must_use]
pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * MPH_TO_KMH_FACTOR
}

/// Converts knots to kilometers per hour.
#[must_use]
pub fn knots_to_kmh(knots: f64) -> f64 {
    knots * KNOTS_TO_KMH_FACTOR
}
