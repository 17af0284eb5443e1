//! Error types for trip-metadata crate.

use thiserror::Error;

/// Errors that can occur while reading or decoding a trip log.
///
/// The taxonomy mirrors the blast radius of each failure:
///
/// - [`MetadataError::Structural`] is fatal for the whole file.
/// - [`MetadataError::RowDecode`] and [`MetadataError::Coercion`] are scoped
///   to one row; readers skip the row and continue.
/// - [`MetadataError::Registry`] is scoped to one query.
///
/// Nothing here retries automatically, and "no more matching rows" is an
/// ordinary empty result, never an error.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The file's structure is broken: missing markers, malformed alias
    /// declaration, or an unknown legacy version. No partial result.
    #[error("structural error: {0}")]
    Structural(String),

    /// One row could not be decoded: field count mismatches the layout
    /// width, or a declared column is out of range.
    #[error("row decode error: {0}")]
    RowDecode(String),

    /// A field value failed numeric or enum parsing.
    #[error("coercion error: field {field}: {reason}")]
    Coercion {
        /// Dotted path of the field that failed.
        field: String,
        /// What went wrong.
        reason: String,
    },

    /// A requested record type has no compatible registered layout.
    #[error("registry error: {0}")]
    Registry(String),

    /// A record-level classification failed.
    #[error(transparent)]
    Record(#[from] trip_types::RecordError),

    /// Underlying file I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    /// Creates a structural error.
    #[must_use]
    pub fn structural(reason: impl Into<String>) -> Self {
        Self::Structural(reason.into())
    }

    /// Creates a row decode error.
    #[must_use]
    pub fn row_decode(reason: impl Into<String>) -> Self {
        Self::RowDecode(reason.into())
    }

    /// Creates a coercion error.
    #[must_use]
    pub fn coercion(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Coercion {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a registry error.
    #[must_use]
    pub fn registry(reason: impl Into<String>) -> Self {
        Self::Registry(reason.into())
    }

    /// Returns `true` if the error is scoped to a single row.
    ///
    /// Row-scoped errors skip the offending row; everything else is
    /// fatal for the current operation.
    #[must_use]
    pub const fn is_row_scoped(&self) -> bool {
        matches!(
            self,
            Self::RowDecode(_) | Self::Coercion { .. } | Self::Record(_)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn row_scoped_classification() {
        assert!(MetadataError::row_decode("short row").is_row_scoped());
        assert!(MetadataError::coercion("gps.latitude", "not a number").is_row_scoped());
        assert!(!MetadataError::structural("missing BODY").is_row_scoped());
        assert!(!MetadataError::registry("no parser").is_row_scoped());
    }

    #[test]
    fn display_includes_field() {
        let err = MetadataError::coercion("gps.latitude", "not a number");
        let text = err.to_string();
        assert!(text.contains("gps.latitude"));
        assert!(text.contains("not a number"));
    }
}
