//! Log format version tags and their compatibility ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::MetadataError;

/// A log format version.
///
/// Legacy tags form a strict compatibility ordering: a layout declared
/// compatible "from 1.0.3 onward" matches every tag at or above `1.0.3`
/// under this ordering. Comparison is numeric by dotted component, never
/// lexical, so `1.0.8 < 1.1` holds.
///
/// The earliest firmware logged no version at all; that era is
/// [`VersionTag::Unversioned`] and sorts below every numbered tag.
///
/// # Example
///
/// ```
/// use trip_metadata::VersionTag;
///
/// let old: VersionTag = "1.0.8".parse().unwrap();
/// let new: VersionTag = "1.1".parse().unwrap();
///
/// assert!(old < new);
/// assert!(new < VersionTag::CURRENT);
/// assert_eq!(old.to_string(), "1.0.8");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionTag {
    /// Pre-versioning firmware; the log's first line carries no tag.
    Unversioned,
    /// A dotted numeric version, `major.minor` or `major.minor.patch`.
    Release {
        /// Major component.
        major: u16,
        /// Minor component.
        minor: u16,
        /// Patch component; two-part tags like `1.1` have none.
        patch: Option<u16>,
    },
}

impl VersionTag {
    /// The current self-describing format, `2.0`.
    pub const CURRENT: Self = Self::two_part(2, 0);

    /// Wire token of the unversioned era.
    pub const UNVERSIONED_TOKEN: &'static str = "no version";

    /// Creates a two-part tag such as `1.1`.
    #[must_use]
    pub const fn two_part(major: u16, minor: u16) -> Self {
        Self::Release {
            major,
            minor,
            patch: None,
        }
    }

    /// Creates a three-part tag such as `1.0.6`.
    #[must_use]
    pub const fn three_part(major: u16, minor: u16, patch: u16) -> Self {
        Self::Release {
            major,
            minor,
            patch: Some(patch),
        }
    }

    /// Returns `true` for the current self-describing format marker.
    #[must_use]
    pub fn is_current(&self) -> bool {
        *self == Self::CURRENT
    }

    fn sort_key(&self) -> (u8, u16, u16, u16, bool) {
        match *self {
            Self::Unversioned => (0, 0, 0, 0, false),
            Self::Release {
                major,
                minor,
                patch,
            } => (1, major, minor, patch.unwrap_or(0), patch.is_some()),
        }
    }
}

impl Ord for VersionTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for VersionTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unversioned => f.write_str(Self::UNVERSIONED_TOKEN),
            Self::Release {
                major,
                minor,
                patch: None,
            } => write!(f, "{major}.{minor}"),
            Self::Release {
                major,
                minor,
                patch: Some(patch),
            } => write!(f, "{major}.{minor}.{patch}"),
        }
    }
}

/// Serializes as the display string (`"1.0.6"`, `"no version"`), the
/// same spelling the log files use.
impl Serialize for VersionTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

impl FromStr for VersionTag {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::UNVERSIONED_TOKEN {
            return Ok(Self::Unversioned);
        }
        let component = |part: &str| {
            part.parse::<u16>()
                .map_err(|_| MetadataError::structural(format!("malformed version tag: {s:?}")))
        };
        let mut parts = s.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(major), Some(minor), None, _) => {
                Ok(Self::two_part(component(major)?, component(minor)?))
            }
            (Some(major), Some(minor), Some(patch), None) => Ok(Self::three_part(
                component(major)?,
                component(minor)?,
                component(patch)?,
            )),
            _ => Err(MetadataError::structural(format!(
                "malformed version tag: {s:?}"
            ))),
        }
    }
}
