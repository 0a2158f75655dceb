//! Intake request handling
//!
//! Transport-independent: takes the method, observed request meta and raw
//! body, and either records exactly one row or rejects with an
//! [`IntakeError`]. The HTTP layer in [`crate::routes`] only translates.

use crate::config::IntakeConfig;
use crate::error::{ConfigError, IntakeError};
use crate::notify::{Notifier, ResendNotifier};
use crate::record::{PersistedRequest, RequestMeta};
use crate::store::{RequestStore, RestStore};
use axum::http::Method;
use chrono::Utc;
use intake_form::{validate, SubmissionPayload};
use std::sync::Arc;
use std::time::Duration;

/// Shared, immutable handler state
#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn RequestStore>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl std::fmt::Debug for IntakeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeService")
            .field("notifier", &self.notifier.is_some())
            .finish_non_exhaustive()
    }
}

impl IntakeService {
    /// Service recording into `store`, without notifications
    #[must_use]
    pub fn new(store: Arc<dyn RequestStore>) -> Self {
        Self {
            store,
            notifier: None,
        }
    }

    /// With operator notifications
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the REST store and, if configured, the email notifier
    ///
    /// # Errors
    /// [`ConfigError`] if the configuration is incomplete or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &IntakeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid {
                name: "http client",
                reason: e.to_string(),
            })?;

        let mut service = Self::new(Arc::new(RestStore::new(client.clone(), &config.store)));
        if let Some(notify) = &config.notify {
            service = service.with_notifier(Arc::new(ResendNotifier::new(client, notify.clone())));
        }
        Ok(service)
    }

    /// Whether notifications are enabled
    #[inline]
    #[must_use]
    pub fn notifies(&self) -> bool {
        self.notifier.is_some()
    }

    /// Handle one submission
    ///
    /// Returns the recorded row. Notification runs only after the insert is
    /// confirmed, and its failure is logged without affecting the result.
    ///
    /// # Errors
    /// - [`IntakeError::MethodNotAllowed`] for anything but POST
    /// - [`IntakeError::MalformedBody`] if the body is not a JSON object
    /// - [`IntakeError::Validation`] if any rule fails
    /// - [`IntakeError::Internal`] if the store did not record the row
    pub async fn handle(
        &self,
        method: &Method,
        meta: RequestMeta,
        body: &[u8],
    ) -> Result<PersistedRequest, IntakeError> {
        if *method != Method::POST {
            tracing::warn!(%method, "rejected non-POST intake request");
            return Err(IntakeError::MethodNotAllowed(method.to_string()));
        }

        let payload: SubmissionPayload = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(error = %e, "malformed intake body");
            IntakeError::MalformedBody(e.to_string())
        })?;

        let validated = validate(&payload).map_err(|e| {
            tracing::warn!(error = %e, "intake validation failed");
            IntakeError::from(e)
        })?;

        let row = PersistedRequest::new(validated, meta, Utc::now());
        if let Err(err) = self.store.insert(&row).await {
            tracing::error!(error = %err, retryable = err.is_retryable(), "failed to record setup request");
            return Err(err.into());
        }
        tracing::info!(
            platform = %row.platform,
            outcome = %row.outcome,
            source_ip = row.source_ip.as_deref().unwrap_or("-"),
            "setup request recorded"
        );

        if let Some(notifier) = &self.notifier {
            if let Err(err) = notifier.notify(&row).await {
                tracing::warn!(error = %err, "setup request notification failed");
            }
        }

        Ok(row)
    }
}
