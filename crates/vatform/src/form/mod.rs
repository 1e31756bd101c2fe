//! Business ID / VAT number check form.
//!
//! The form turns free-text input into a sanitized identifier, gates
//! submission on a challenge token, sends one validation request at a time,
//! and derives the banner shown for the result:
//! - Sanitization and the submit gate
//! - Challenge widget token lifecycle
//! - Idle / Pending / Succeeded / Failed submission state
//! - Pure presentation derivation

pub mod challenge;
mod controller;
pub mod sanitize;
mod state;
pub mod view;

pub use challenge::{ChallengeSettings, ChallengeToken};
pub use controller::{SubmitOutcome, ValidationFormController};
pub use sanitize::{MIN_IDENTIFIER_LEN, can_submit, sanitize};
pub use state::{FailureKind, SubmissionState};
pub use view::{Banner, FormLabels, Presentation, Severity};
