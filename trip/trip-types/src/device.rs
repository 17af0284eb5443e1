//! Capture device identity records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{RecordError, Timestamp};

/// What kind of visual data a log describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RecordingType {
    /// Recording type could not be determined.
    #[default]
    Unknown,
    /// Still photo sequence.
    Photo,
    /// Video sequence with per-frame index records.
    Video,
    /// Raw capture.
    Raw,
}

impl RecordingType {
    /// Classifies a logged recording-type token.
    ///
    /// Matching is by substring, as the devices log variants like
    /// `"photo"` or `"video-4k"`; anything else maps to [`Self::Unknown`].
    #[must_use]
    pub fn classify(token: &str) -> Self {
        if token.contains("photo") {
            Self::Photo
        } else if token.contains("video") {
            Self::Video
        } else if token.contains("raw") {
            Self::Raw
        } else {
            Self::Unknown
        }
    }

    /// Parses an exact lowercase token, rejecting anything unrecognized.
    ///
    /// Used for legacy summary lines where the token is a closed field
    /// rather than free text.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownRecordingType`] for any other token.
    pub fn from_token(token: &str) -> Result<Self, RecordError> {
        match token {
            "photo" => Ok(Self::Photo),
            "video" => Ok(Self::Video),
            "raw" => Ok(Self::Raw),
            other => Err(RecordError::unknown_recording_type(other)),
        }
    }
}

/// Capture device platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Platform {
    /// iOS family devices.
    Ios,
    /// Android family devices (everything that is not iOS).
    Android,
}

impl Platform {
    /// Classifies a platform from the raw device name.
    ///
    /// Historic rule: a raw name containing an iOS-like token
    /// (`"iP"`, as in `iPhone10,3` or `iPad7,4`) is iOS, everything else
    /// is Android.
    #[must_use]
    pub fn from_device_name(raw_name: &str) -> Self {
        if raw_name.contains("iP") {
            Self::Ios
        } else {
            Self::Android
        }
    }

    /// Display name of the platform.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
        }
    }
}

/// Identity of the device that produced a log.
///
/// In the current format this is decoded from a DEVICE row; in legacy logs
/// it is reconstructed from the first-line device/version summary.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceIdentity {
    /// Time the row was logged (zero for legacy summaries).
    pub timestamp: Option<Timestamp>,

    /// Platform the log was recorded on.
    pub platform_name: Option<String>,

    /// Custom OS name if the vendor ships one (e.g. `Paranoid Android`).
    pub os_raw_name: Option<String>,

    /// OS version of the device.
    pub os_version: Option<String>,

    /// Raw device name, e.g. `iPhone10,3` for iPhone X.
    pub device_raw_name: Option<String>,

    /// App version in `X.Y` or `X.Y.Z` form.
    pub app_version: Option<String>,

    /// Build number for the app version.
    pub app_build_number: Option<String>,

    /// The kind of recording this log describes.
    pub recording_type: Option<RecordingType>,
}

impl DeviceIdentity {
    /// Returns the platform classified from the raw device name, if known.
    #[must_use]
    pub fn platform(&self) -> Option<Platform> {
        self.device_raw_name
            .as_deref()
            .map(Platform::from_device_name)
    }

    /// Returns `true` if the raw device name contains `needle`.
    #[must_use]
    pub fn device_name_contains(&self, needle: &str) -> bool {
        self.device_raw_name
            .as_deref()
            .is_some_and(|name| name.contains(needle))
    }
}
