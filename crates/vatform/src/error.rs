//! Validation request error types.

use thiserror::Error;

use crate::form::FailureKind;

/// Errors from a single validation round trip.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("validation endpoint returned HTTP {0}")]
    Status(u16),

    #[error("malformed validation response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("validation response is not a JSON object")]
    NotAnObject,
}

impl ClientError {
    /// Collapse the error into the failure kind kept in the form state.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ClientError::Request(_) => FailureKind::Network,
            ClientError::Status(status) => FailureKind::Status(*status),
            ClientError::Decode(_) | ClientError::NotAnObject => FailureKind::Decode,
        }
    }
}

/// Result type alias using ClientError.
pub type ClientResult<T> = Result<T, ClientError>;
