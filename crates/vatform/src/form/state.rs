//! Submission state machine.

use serde::{Deserialize, Serialize};

use crate::client::ValidationResult;

/// Why a submission ended without a decoded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection, timeout, or an abandoned request.
    Network,
    /// Non-success HTTP status.
    Status(u16),
    /// Body was not a double-encoded JSON object.
    Decode,
}

/// Where the form is in its submit cycle.
///
/// `Idle` means nothing was ever submitted. `Pending` doubles as the empty
/// placeholder result shown while a request is in flight. Neither
/// `Succeeded` nor `Failed` is terminal: a new submit starts another cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "result", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded(ValidationResult),
    Failed(FailureKind),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    /// The decoded result, if the last cycle produced one.
    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}
