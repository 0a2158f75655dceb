//! Error types for the overlay crate
//!
//! - Overlay lookups that found nothing
//! - Document loads for the viewer overlay
//! - Form submissions from the browser

use intake_form::{Advisory, ValidationError};

/// Overlay controller errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    /// No element with this id
    #[error("unknown overlay: {0}")]
    UnknownOverlay(String),

    /// In-page navigation target missing
    #[error("unknown anchor: {0}")]
    UnknownAnchor(String),
}

/// Document load errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// Source answered with a non-success status
    #[error("content not found: {path} (status {status})")]
    NotFound { path: String, status: u16 },

    /// Request never completed
    #[error("content transport error for {path}: {message}")]
    Transport { path: String, message: String },
}

impl ContentError {
    /// Create transport error for path
    pub fn transport(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Generic text shown when the intake service refuses or cannot be reached
pub const SUBMISSION_FAILED_MESSAGE: &str = "Submission failed. Try again later.";

/// Browser-side submission errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Client-side validation failed; nothing was sent
    #[error("invalid submission: {0}")]
    Invalid(#[from] ValidationError),

    /// Free-provider email without the company-managed acknowledgment
    #[error("acknowledgment required: {}", .0.message())]
    AcknowledgmentRequired(Advisory),

    /// A submission is already in flight
    #[error("submission already pending")]
    AlreadyPending,

    /// Service answered with an error status
    #[error("rejected by intake service (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Service unreachable or response unreadable
    #[error("transport error: {0}")]
    Transport(String),
}

impl SubmitError {
    /// Message to show the submitter
    ///
    /// Service-side failures collapse to one generic text; backend details
    /// stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(err) => err.user_message().to_string(),
            Self::AcknowledgmentRequired(advisory) => advisory.message(),
            Self::AlreadyPending => "Your request is already being submitted.".to_string(),
            Self::Rejected { .. } | Self::Transport(_) => SUBMISSION_FAILED_MESSAGE.to_string(),
        }
    }

    /// Whether the same payload might succeed on a later attempt
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_form::Field;

    #[test]
    fn service_failures_hide_details() {
        let err = SubmitError::Rejected {
            status: 500,
            message: "Database insert failed".into(),
        };
        assert_eq!(err.user_message(), SUBMISSION_FAILED_MESSAGE);
        assert!(err.is_retryable());
    }

    #[test]
    fn validation_failures_are_not_retryable() {
        let err = SubmitError::from(ValidationError::MissingField(Field::Email));
        assert!(!err.is_retryable());
        assert!(err.user_message().starts_with("Please fill required fields"));
    }
}
