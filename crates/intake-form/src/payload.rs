//! Submission payload types
//!
//! [`SubmissionPayload`] is deliberately loose: every field is optional so a
//! half-filled form or a hand-written JSON body still deserializes and the
//! validator can name what is wrong. [`ValidatedPayload`] is the typed result.

use serde::{Deserialize, Serialize};

/// Target platform of the setup request
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Platform {
    Web,
    #[serde(rename = "iOS")]
    #[strum(serialize = "iOS")]
    Ios,
    Android,
}

/// Requested service
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Outcome {
    Foundation,
    Cleanup,
}

/// Raw submission as collected from the form or received over HTTP
///
/// Unknown keys (e.g. a client-side `submitted_at`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub figma_url: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    /// `None` when absent or `null`; only `Some(true)` counts as consent
    #[serde(default)]
    pub consent_files: Option<bool>,
    #[serde(default)]
    pub consent_data: Option<bool>,
}

impl SubmissionPayload {
    /// Payload with the four required text fields set and no consents
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        platform: impl Into<String>,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            platform: Some(platform.into()),
            outcome: Some(outcome.into()),
            ..Self::default()
        }
    }

    /// With consent flags
    #[inline]
    #[must_use]
    pub fn with_consents(mut self, files: bool, data: bool) -> Self {
        self.consent_files = Some(files);
        self.consent_data = Some(data);
        self
    }

    /// With Figma link
    #[inline]
    #[must_use]
    pub fn with_figma_url(mut self, url: impl Into<String>) -> Self {
        self.figma_url = Some(url.into());
        self
    }
}

/// Submission that passed every validation rule
///
/// Text fields are trimmed, `figma_url` is `None` when it was blank, and
/// both consent flags are known to be `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedPayload {
    pub name: String,
    pub email: String,
    pub platform: Platform,
    pub figma_url: Option<String>,
    pub outcome: Outcome,
    pub consent_files: bool,
    pub consent_data: bool,
}
