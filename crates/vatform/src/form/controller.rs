//! The validation form controller.
//!
//! Owns the mutable form state: raw input, challenge token, and submission
//! state. Every event handler (keystroke, widget callbacks, submit click)
//! goes through a method here. State sits behind a mutex so handlers can be
//! invoked from concurrent tasks; the lock is never held across an await,
//! which leaves only the submission state guarding against overlapping
//! requests.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::client::{HttpValidationClient, ValidationClient, VatRequest};
use crate::config::Config;
use crate::error::ClientResult;

use super::challenge::{ChallengeSettings, ChallengeToken};
use super::sanitize::{can_submit, sanitize};
use super::state::{FailureKind, SubmissionState};
use super::view::Presentation;

/// What a submit call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request ran; carries the state it settled in.
    Completed(SubmissionState),
    /// Another submission is in flight; nothing changed.
    AlreadyPending,
    /// The submit gate is closed (no token or identifier too short).
    Blocked,
}

#[derive(Debug, Default)]
struct FormInner {
    raw_input: String,
    token: ChallengeToken,
    state: SubmissionState,
}

/// Controller for the business ID / VAT number check form.
pub struct ValidationFormController {
    client: Arc<dyn ValidationClient>,
    country_code: String,
    challenge: ChallengeSettings,
    inner: Mutex<FormInner>,
}

impl ValidationFormController {
    /// Create a controller submitting through `client` for `country_code`.
    pub fn new(client: Arc<dyn ValidationClient>, country_code: impl Into<String>) -> Self {
        Self {
            client,
            country_code: country_code.into(),
            challenge: ChallengeSettings::default(),
            inner: Mutex::new(FormInner::default()),
        }
    }

    /// Create a controller backed by the HTTP client described in `config`.
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let client = HttpValidationClient::new(config.endpoint_url.as_str(), config.request_timeout)?;
        Ok(Self::new(Arc::new(client), config.country_code.clone())
            .with_challenge(ChallengeSettings {
                site_key: config.site_key.clone(),
            }))
    }

    /// Replace the challenge widget settings.
    pub fn with_challenge(mut self, challenge: ChallengeSettings) -> Self {
        self.challenge = challenge;
        self
    }

    pub fn challenge(&self) -> &ChallengeSettings {
        &self.challenge
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Keystroke handler: replace the raw input.
    pub fn set_input(&self, raw: impl Into<String>) {
        self.inner.lock().raw_input = raw.into();
    }

    pub fn raw_input(&self) -> String {
        self.inner.lock().raw_input.clone()
    }

    /// The identifier as it would be submitted now.
    pub fn sanitized(&self) -> String {
        sanitize(&self.inner.lock().raw_input)
    }

    /// Challenge widget verify callback.
    pub fn on_verify(&self, token: impl Into<String>) {
        self.inner.lock().token.on_verify(token);
        debug!("challenge token received");
    }

    /// Challenge widget expire callback.
    pub fn on_expire(&self) {
        self.inner.lock().token.on_expire();
        debug!("challenge token expired");
    }

    pub fn has_token(&self) -> bool {
        self.inner.lock().token.is_present()
    }

    /// Whether the current input and token pass the submit gate.
    pub fn can_submit(&self) -> bool {
        let inner = self.inner.lock();
        can_submit(&sanitize(&inner.raw_input), &inner.token)
    }

    /// Whether the submit button should be enabled.
    pub fn submit_enabled(&self) -> bool {
        let inner = self.inner.lock();
        !inner.state.is_pending() && can_submit(&sanitize(&inner.raw_input), &inner.token)
    }

    pub fn state(&self) -> SubmissionState {
        self.inner.lock().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.lock().state.is_pending()
    }

    /// Derive what the form should show.
    pub fn presentation(&self) -> Presentation {
        let inner = self.inner.lock();
        let gate = can_submit(&sanitize(&inner.raw_input), &inner.token);
        Presentation::derive(&inner.state, gate)
    }

    /// Submit the current input with the configured country code.
    ///
    /// Refuses with [`SubmitOutcome::Blocked`] when the gate is closed.
    pub async fn submit_form(&self) -> SubmitOutcome {
        let sanitized = {
            let inner = self.inner.lock();
            let sanitized = sanitize(&inner.raw_input);
            if !can_submit(&sanitized, &inner.token) {
                debug!(
                    has_token = inner.token.is_present(),
                    length = sanitized.len(),
                    "submit blocked"
                );
                return SubmitOutcome::Blocked;
            }
            sanitized
        };

        self.submit(&self.country_code, &sanitized).await
    }

    /// Run one validation round trip.
    ///
    /// Does not check the identifier length or the token; callers gate on
    /// [`Self::can_submit`]. While a request is in flight further calls
    /// return [`SubmitOutcome::AlreadyPending`] and change nothing.
    pub async fn submit(&self, country_code: &str, sanitized: &str) -> SubmitOutcome {
        {
            let mut inner = self.inner.lock();
            if inner.state.is_pending() {
                debug!("submit ignored, request already in flight");
                return SubmitOutcome::AlreadyPending;
            }
            inner.state = SubmissionState::Pending;
        }
        let pending = PendingGuard::new(&self.inner);

        info!(country = %country_code, length = sanitized.len(), "validating business id");
        debug!(vat_number = %sanitized, "validation request");

        let request = VatRequest::new(country_code, sanitized);
        let next = match self.client.validate(&request).await {
            Ok(result) => {
                info!(valid = result.valid, "validation completed");
                SubmissionState::Succeeded(result)
            }
            Err(e) => {
                warn!(error = %e, "validation failed");
                SubmissionState::Failed(e.failure_kind())
            }
        };

        pending.settle(next.clone());
        SubmitOutcome::Completed(next)
    }
}

impl std::fmt::Debug for ValidationFormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationFormController")
            .field("country_code", &self.country_code)
            .field("state", &self.inner.lock().state)
            .finish_non_exhaustive()
    }
}

/// Clears Pending when a submission ends without settling, i.e. the request
/// future was dropped or the client panicked.
struct PendingGuard<'a> {
    inner: &'a Mutex<FormInner>,
    settled: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(inner: &'a Mutex<FormInner>) -> Self {
        Self {
            inner,
            settled: false,
        }
    }

    fn settle(mut self, next: SubmissionState) {
        self.inner.lock().state = next;
        self.settled = true;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.state.is_pending() {
            warn!("validation request abandoned");
            inner.state = SubmissionState::Failed(FailureKind::Network);
        }
    }
}
