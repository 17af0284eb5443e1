//! Photo correlation for legacy logs.
//!
//! Legacy logs interleave single-purpose sensor rows with photo-index
//! rows instead of pre-joining them. This module attaches to each photo
//! the most recently observed position, diagnostics and compass reading,
//! in one deterministic forward pass with constant auxiliary state.

use trip_types::{Compass, GpsRecord, Obd, PhotoFrame, TripRecord};

/// Single-pass aggregation state: the last observed reading of each
/// auxiliary sensor type.
#[derive(Debug, Default)]
pub struct Correlator {
    gps: Option<GpsRecord>,
    obd: Option<Obd>,
    compass: Option<Compass>,
}

impl Correlator {
    /// Creates an empty correlator; every slot starts unobserved.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one record in stream order.
    ///
    /// Position, diagnostics and compass records update their slot and
    /// yield nothing. A photo record yields the frame stamped with the
    /// current slot contents; slots never yet observed leave the frame's
    /// pre-allocated empty snapshot in place, so a photo seen before any
    /// position is still emitted, with its position absent. All other
    /// record kinds pass through without effect.
    pub fn observe(&mut self, record: &TripRecord) -> Option<PhotoFrame> {
        match record {
            TripRecord::Gps(gps) => {
                self.gps = Some(gps.clone());
                None
            }
            TripRecord::Obd(obd) => {
                self.obd = Some(obd.clone());
                None
            }
            TripRecord::Compass(compass) => {
                self.compass = Some(compass.clone());
                None
            }
            TripRecord::Photo(photo) => Some(self.stamp(photo)),
            _ => None,
        }
    }

    fn stamp(&self, photo: &PhotoFrame) -> PhotoFrame {
        let mut stamped = photo.clone();
        if let Some(gps) = &self.gps {
            stamped.gps = gps.clone();
        }
        if let Some(obd) = &self.obd {
            stamped.obd = obd.clone();
        }
        if let Some(compass) = &self.compass {
            stamped.compass = compass.clone();
        }
        stamped
    }
}

/// Folds a record stream into its correlated photo frames, in stream
/// order. `limit` caps the number of frames returned.
#[must_use]
pub fn correlate_photos<'a, I>(records: I, limit: Option<usize>) -> Vec<PhotoFrame>
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    let mut correlator = Correlator::new();
    let mut photos = Vec::new();
    for record in records {
        if let Some(photo) = correlator.observe(record) {
            photos.push(photo);
            if limit.is_some_and(|cap| photos.len() >= cap) {
                break;
            }
        }
    }
    photos
}

/// Stamps photo records in place, leaving every other record untouched.
///
/// Used when a caller wants the full record stream with photos already
/// aggregated rather than extracted.
pub(crate) fn stamp_in_stream(records: &mut [TripRecord]) {
    let mut correlator = Correlator::new();
    for record in records.iter_mut() {
        if let Some(stamped) = correlator.observe(&record.clone()) {
            *record = TripRecord::Photo(stamped);
        }
    }
}
