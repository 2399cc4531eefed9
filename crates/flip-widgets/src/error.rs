#![forbid(unsafe_code)]

//! Errors reported by the flip label.

use std::fmt;

use flip_text::MetricsError;

/// Rejected property writes.
///
/// A rejected write leaves the previous value in place.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelError {
    /// A required property was cleared or set to an unusable value.
    InvalidArgument {
        property: &'static str,
        reason: String,
    },
}

impl LabelError {
    pub(crate) fn invalid(property: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            property,
            reason: reason.into(),
        }
    }

    /// Name of the property whose write was rejected.
    pub fn property(&self) -> &'static str {
        match self {
            Self::InvalidArgument { property, .. } => property,
        }
    }
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { property, reason } => {
                write!(f, "invalid argument for `{property}`: {reason}")
            }
        }
    }
}

impl std::error::Error for LabelError {}

impl From<MetricsError> for LabelError {
    fn from(err: MetricsError) -> Self {
        Self::invalid("font", err.to_string())
    }
}
