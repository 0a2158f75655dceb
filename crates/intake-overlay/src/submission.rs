//! Setup form submission
//!
//! Validates locally, enforces the company-managed acknowledgment for
//! free-provider addresses, posts to the intake service and then swaps the
//! form overlay for the success overlay. Local checks are a convenience; the
//! service validates again.

use crate::controller::OverlayController;
use crate::dom::{Document, Slot};
use crate::error::SubmitError;
use intake_form::{advise, validate, SubmissionPayload, ValidatedPayload};
use serde::Deserialize;

/// Message shown in the success overlay
pub const SUCCESS_MESSAGE: &str = "Your request has been received and will be reviewed. You’ll receive next steps by email within 24–48 hours.";

/// Submission lifecycle as seen by the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    /// User-facing message for the last failure
    Failed(String),
}

/// Current form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub payload: SubmissionPayload,
    /// "This address is company-managed" checkbox
    pub company_managed_ack: bool,
}

impl FormState {
    /// Form pre-filled with `payload`
    #[must_use]
    pub fn new(payload: SubmissionPayload) -> Self {
        Self {
            payload,
            company_managed_ack: false,
        }
    }

    /// Reset every field
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Delivers a validated payload to the intake service
#[async_trait::async_trait]
pub trait SubmitTransport: Send + Sync {
    /// Send one submission
    async fn send(&self, payload: &ValidatedPayload) -> Result<(), SubmitError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// JSON-over-HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpTransport {
    /// Create transport posting to `endpoint` (e.g. `https://site/api/setup`)
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: reqwest::Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait::async_trait]
impl SubmitTransport for HttpTransport {
    async fn send(&self, payload: &ValidatedPayload) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Submission failed").to_string());
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Holds [`SubmissionState::Pending`] while a send is in flight
///
/// Dropping it returns the state to `Idle`, whether the send completed or
/// its future was abandoned, so the submit control is never stuck disabled.
struct PendingGuard<'a> {
    state: &'a mut SubmissionState,
}

impl<'a> PendingGuard<'a> {
    fn enter(state: &'a mut SubmissionState) -> Self {
        *state = SubmissionState::Pending;
        Self { state }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if *self.state == SubmissionState::Pending {
            *self.state = SubmissionState::Idle;
        }
    }
}

/// Drives one form through validation, sending and overlay hand-off
#[derive(Debug)]
pub struct SubmissionClient<T: SubmitTransport> {
    transport: T,
    success_overlay: String,
    state: SubmissionState,
}

impl<T: SubmitTransport> SubmissionClient<T> {
    /// Create client that shows `success_overlay` on success
    #[must_use]
    pub fn new(transport: T, success_overlay: impl Into<String>) -> Self {
        Self {
            transport,
            success_overlay: success_overlay.into(),
            state: SubmissionState::Idle,
        }
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Whether the submit control should be enabled
    #[inline]
    #[must_use]
    pub fn submit_enabled(&self) -> bool {
        self.state != SubmissionState::Pending
    }

    /// Validate, send, and on success replace the form overlay with the
    /// success overlay and clear the form. On failure the form is left as is.
    ///
    /// # Errors
    /// Any [`SubmitError`]; the same failure is reflected in
    /// [`state`](Self::state) as a user-facing message.
    pub async fn submit<D: Document>(
        &mut self,
        form: &mut FormState,
        overlays: &mut OverlayController<D>,
    ) -> Result<(), SubmitError> {
        if self.state == SubmissionState::Pending {
            return Err(SubmitError::AlreadyPending);
        }

        let validated = match self.precheck(form) {
            Ok(validated) => validated,
            Err(err) => return Err(self.fail(err)),
        };

        let sent = {
            let _pending = PendingGuard::enter(&mut self.state);
            self.transport.send(&validated).await
        };
        if let Err(err) = sent {
            tracing::error!(error = %err, "setup submission failed");
            return Err(self.fail(err));
        }

        if let Err(err) = overlays
            .set_overlay_text(&self.success_overlay, Slot::Body, SUCCESS_MESSAGE)
            .and_then(|()| overlays.replace_top(&self.success_overlay))
        {
            tracing::warn!(error = %err, "success overlay missing");
        }

        form.clear();
        self.state = SubmissionState::Succeeded;
        tracing::info!(platform = %validated.platform, outcome = %validated.outcome, "setup request submitted");
        Ok(())
    }

    fn precheck(&self, form: &FormState) -> Result<ValidatedPayload, SubmitError> {
        let validated = validate(&form.payload)?;
        if let Some(advisory) = advise(&validated.email) {
            if !form.company_managed_ack {
                return Err(SubmitError::AcknowledgmentRequired(advisory));
            }
        }
        Ok(validated)
    }

    fn fail(&mut self, err: SubmitError) -> SubmitError {
        self.state = SubmissionState::Failed(err.user_message());
        err
    }
}
