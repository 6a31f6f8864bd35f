//! Custom error types for editguard.

use crate::canonical::Format;

/// A failure reported by one of the underlying serde codecs.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by extra-field detection.
///
/// Finding extra fields is not an error; it is reported through a non-empty
/// [`DiffReport`](crate::report::DiffReport).
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("Edited document is not valid {format}: {source}")]
    Malformed {
        format: Format,
        #[source]
        source: DecodeError,
    },

    #[error("Failed to serialize to canonical {format}: {source}")]
    Serialization {
        format: Format,
        #[source]
        source: DecodeError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to serialize report to JSON: {source}")]
    JsonSerializationError {
        #[source]
        source: serde_json::Error,
    },
}

impl DetectError {
    pub fn malformed(format: Format, source: impl Into<DecodeError>) -> Self {
        Self::Malformed {
            format,
            source: source.into(),
        }
    }

    pub fn serialization(format: Format, source: impl Into<DecodeError>) -> Self {
        Self::Serialization {
            format,
            source: source.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
