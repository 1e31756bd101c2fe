//! vatform library
//!
//! Business ID / VAT number check form: input sanitization, challenge token
//! gating, the validation request state machine, and the HTTP client for the
//! registry lookup endpoint. The `vatform` binary drives the same controller
//! from the command line.

pub mod client;
pub mod config;
pub mod error;
pub mod form;

pub use client::{HttpValidationClient, ValidationClient, ValidationResult, VatRequest};
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use form::{
    Banner, FailureKind, Presentation, SubmissionState, SubmitOutcome, ValidationFormController,
};
