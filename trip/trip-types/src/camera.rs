//! Camera and EXIF parameter records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{RecordError, Timestamp};

/// Lens projection model of the capture camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CameraProjection {
    /// Full equirectangular panorama.
    Equirectangular,
    /// Dual fisheye, both lenses in one frame.
    DualFisheye,
    /// Back-facing fisheye lens.
    FisheyeBack,
    /// Front-facing fisheye lens.
    FisheyeFront,
    /// Plain rectilinear projection.
    Plain,
}

impl CameraProjection {
    /// Classifies a projection from a logged projection name.
    ///
    /// Matching is case-insensitive by substring; `plain` is checked first
    /// since vendor names embed it in longer tokens.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownProjection`] when no known name matches.
    pub fn from_name(name: &str) -> Result<Self, RecordError> {
        let lower = name.to_lowercase();
        if lower.contains("plain") {
            Ok(Self::Plain)
        } else if lower.contains("equirectangular") {
            Ok(Self::Equirectangular)
        } else if lower.contains("dual_fisheye") {
            Ok(Self::DualFisheye)
        } else if lower.contains("fisheye_front") {
            Ok(Self::FisheyeFront)
        } else if lower.contains("fisheye_back") {
            Ok(Self::FisheyeBack)
        } else {
            Err(RecordError::unknown_projection(name))
        }
    }
}

/// Camera parameters logged alongside a capture sequence.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraParameters {
    /// Time the row was logged.
    pub timestamp: Option<Timestamp>,

    /// Horizontal field of view in degrees.
    pub h_fov: Option<f64>,

    /// Vertical field of view in degrees.
    ///
    /// Unset for rows decoded from the v1 camera layout, which logged a
    /// value this engine cannot trust.
    pub v_fov: Option<f64>,

    /// Aperture as logged by the device, kept verbatim.
    pub aperture: Option<String>,

    /// Lens projection, when the log declares one.
    pub projection: Option<CameraProjection>,
}

/// EXIF-sourced parameters logged by newer firmware.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExifParameters {
    /// Time the row was logged.
    pub timestamp: Option<Timestamp>,

    /// Focal length in millimeters.
    pub focal_length: Option<f64>,

    /// Image width in pixels.
    pub width: Option<u32>,

    /// Image height in pixels.
    pub height: Option<u32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn projection_from_name_case_insensitive() {
        assert_eq!(
            CameraProjection::from_name("PLAIN").unwrap(),
            CameraProjection::Plain
        );
        assert_eq!(
            CameraProjection::from_name("equirectangular-v2").unwrap(),
            CameraProjection::Equirectangular
        );
        assert_eq!(
            CameraProjection::from_name("DUAL_FISHEYE").unwrap(),
            CameraProjection::DualFisheye
        );
        assert_eq!(
            CameraProjection::from_name("fisheye_front").unwrap(),
            CameraProjection::FisheyeFront
        );
        assert_eq!(
            CameraProjection::from_name("Fisheye_Back").unwrap(),
            CameraProjection::FisheyeBack
        );
    }

    #[test]
    fn projection_unknown_name_errors() {
        assert!(CameraProjection::from_name("cylindrical").is_err());
    }

    #[test]
    fn camera_defaults_unset() {
        let camera = CameraParameters::default();
        assert!(camera.h_fov.is_none());
        assert!(camera.v_fov.is_none());
        assert!(camera.aperture.is_none());
        assert!(camera.projection.is_none());
    }

    #[test]
    fn exif_defaults_unset() {
        let exif = ExifParameters::default();
        assert!(exif.focal_length.is_none());
        assert!(exif.width.is_none());
        assert!(exif.height.is_none());
    }
}
