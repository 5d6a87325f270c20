//! Error types for lookup keys, expansion and record loading.

use crate::store::StoreError;

/// Protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A lookup key string did not parse as `<type>:<id>`.
    #[error("malformed lookup key '{key}': {reason}")]
    MalformedKey { key: String, reason: String },

    /// Expansion found a unique object whose name is not a lookup key.
    #[error("stored object '{key}' is not a lookup key: {reason}")]
    MalformedStoredKey { key: String, reason: String },

    /// Partial key matched nothing in its namespace.
    #[error("partial key '{key}' matches zero certificates")]
    NoMatch { key: String },

    /// Partial key matched several objects.
    #[error("partial key '{key}' matches multiple certificates ({})", matches.len())]
    AmbiguousKey { key: String, matches: Vec<String> },

    /// Record does not exist in the store.
    #[error("object not found: {key}")]
    NotFound { key: String },

    /// Store or transport failure.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// Fetched bytes are not the expected record JSON.
    #[error("unable to decode object ({key}): {source}")]
    DecodeFailure {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded for storage.
    #[error("unable to encode object ({key}): {source}")]
    EncodeFailure {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ProtocolError {
    pub(crate) fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from correctable user input rather than a system fault.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NoMatch { .. } | Self::AmbiguousKey { .. } | Self::MalformedKey { .. }
        )
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Fix the input and retry
            Self::MalformedKey { .. } => 1,
            Self::EncodeFailure { .. } => 1,
            Self::NoMatch { .. } => 1,
            Self::AmbiguousKey { .. } => 1,

            Self::NotFound { .. } => 2,
            Self::StoreUnavailable(_) => 3,

            // Corrupt bucket contents
            Self::MalformedStoredKey { .. } => 4,
            Self::DecodeFailure { .. } => 4,
        }
    }
}

impl From<StoreError> for ProtocolError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { key } => Self::NotFound { key },
            other => Self::StoreUnavailable(other),
        }
    }
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
