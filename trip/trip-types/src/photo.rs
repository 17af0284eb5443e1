//! Photo/video frame index records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Compass, GpsRecord, Obd, Timestamp};

/// One photo or video frame, with the sensor snapshots that describe it.
///
/// The embedded [`GpsRecord`], [`Obd`] and [`Compass`] sub-records are
/// pre-allocated by `Default`. In current-format logs the photo row itself
/// carries them; in legacy logs they start empty and the correlation pass
/// stamps each photo with the most recently observed reading of each kind.
/// A photo logged before any position reading keeps an empty snapshot; it is
/// never dropped.
///
/// # Example
///
/// ```
/// use trip_types::{PhotoFrame, Timestamp};
///
/// let mut photo = PhotoFrame::default();
/// photo.timestamp = Some(Timestamp::from_secs_f64(12.0));
/// photo.frame_index = Some(3);
///
/// assert!(photo.video_index.is_none());
/// assert!(!photo.gps.has_fix());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhotoFrame {
    /// Time the frame was captured.
    pub timestamp: Option<Timestamp>,

    /// Index of the video file holding this frame's image data.
    ///
    /// Set only for video-sequence logs.
    pub video_index: Option<u64>,

    /// Frame index relative to the entire capture sequence.
    ///
    /// Unique within one log.
    pub frame_index: Option<u64>,

    /// Most recent position at or before this frame.
    pub gps: GpsRecord,

    /// Most recent on-board diagnostics reading at or before this frame.
    pub obd: Obd,

    /// Most recent compass reading at or before this frame.
    pub compass: Compass,
}

impl PhotoFrame {
    /// Returns `true` if this frame belongs to a video sequence.
    #[must_use]
    pub const fn is_video_frame(&self) -> bool {
        self.video_index.is_some()
    }

    /// Identity comparison: timestamp, coordinates and frame indices.
    #[must_use]
    pub fn same_frame(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
            && self.gps.latitude == other.gps.latitude
            && self.gps.longitude == other.gps.longitude
            && self.video_index == other.video_index
            && self.frame_index == other.frame_index
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshots_empty() {
        let photo = PhotoFrame::default();
        assert!(photo.gps.is_empty());
        assert!(!photo.obd.has_speed());
        assert!(!photo.compass.has_heading());
        assert!(!photo.is_video_frame());
    }

    #[test]
    fn video_frame_detection() {
        let photo = PhotoFrame {
            video_index: Some(2),
            frame_index: Some(17),
            ..PhotoFrame::default()
        };
        assert!(photo.is_video_frame());
    }

    #[test]
    fn same_frame_ignores_snapshots() {
        let mut a = PhotoFrame::default();
        a.timestamp = Some(Timestamp::from_secs_f64(5.0));
        a.frame_index = Some(1);

        let mut b = a.clone();
        b.obd.speed = Some(42.0);

        assert!(a.same_frame(&b));
        assert_ne!(a, b);
    }
}
