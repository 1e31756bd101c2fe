//! Presentation derived from form state.
//!
//! Everything here is a pure function of the controller's state. Rendering
//! (markup, styling, the progress overlay itself) is left to the caller.

use serde::{Deserialize, Serialize};

use super::state::SubmissionState;

/// Message shown when the registry does not know the identifier.
pub const NOT_FOUND_MESSAGE: &str = "Yritystä ei löytynyt";

/// Message shown when the lookup itself failed.
pub const FAILURE_MESSAGE: &str = "Tarkistus epäonnistui. Yritä uudelleen.";

/// Banner severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// The single banner shown above the form, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Banner {
    /// Identifier is valid; carries the registered name.
    Success { name: String },
    /// Lookup succeeded but the identifier is not valid.
    NotFound,
    /// Lookup could not be completed.
    Failure,
}

impl Banner {
    pub fn severity(&self) -> Severity {
        match self {
            Banner::Success { .. } => Severity::Success,
            Banner::NotFound | Banner::Failure => Severity::Error,
        }
    }

    /// Text to display in the banner.
    pub fn message(&self) -> &str {
        match self {
            Banner::Success { name } => name,
            Banner::NotFound => NOT_FOUND_MESSAGE,
            Banner::Failure => FAILURE_MESSAGE,
        }
    }
}

/// What the form should show right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    /// Blocking progress indicator over the form.
    pub show_progress: bool,

    pub banner: Option<Banner>,

    /// Whether the submit button is enabled.
    pub submit_enabled: bool,
}

impl Presentation {
    /// Derive the view for a submission state.
    pub fn derive(state: &SubmissionState, submit_enabled: bool) -> Self {
        let banner = match state {
            SubmissionState::Idle | SubmissionState::Pending => None,
            SubmissionState::Succeeded(result) if result.valid => result
                .registered_name()
                .map(|name| Banner::Success {
                    name: name.to_string(),
                }),
            SubmissionState::Succeeded(_) => Some(Banner::NotFound),
            SubmissionState::Failed(_) => Some(Banner::Failure),
        };

        Self {
            show_progress: state.is_pending(),
            banner,
            submit_enabled: submit_enabled && !state.is_pending(),
        }
    }
}

/// Static copy rendered by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLabels {
    pub heading: String,
    pub help: String,
    pub field_label: String,
    pub field_placeholder: String,
    pub submit_label: String,
}

impl Default for FormLabels {
    fn default() -> Self {
        Self {
            heading: "Tarkista yrityksen Y-tunnus/ALV-numero".to_string(),
            help: "Kokeile VIES-järjestelmää. Kirjoita kenttään suomalaisen yrityksen \
                   Y-tunnus tai ALV-numero."
                .to_string(),
            field_label: "Y-tunnus/ALV-numero".to_string(),
            field_placeholder: "Syötä Y-tunnus/ALV-numero".to_string(),
            submit_label: "Tarkista".to_string(),
        }
    }
}
