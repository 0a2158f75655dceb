//! Error types for the intake service
//!
//! Every variant maps to one HTTP status and one public message. Internal
//! detail (store responses, transport errors) goes to the log only.

use intake_form::ValidationError;

/// Request-level failure
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// Anything but POST
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Body is not a JSON object of the expected shape
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Body exceeded the configured size limit
    #[error("request body larger than {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Payload failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Persistence failed; nothing was recorded
    #[error("internal error: {0}")]
    Internal(#[from] StoreError),
}

impl IntakeError {
    /// HTTP status code
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed(_) => 405,
            Self::MalformedBody(_) | Self::Validation(_) => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::Internal(_) => 500,
        }
    }

    /// Text for the `error` field of the response
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::MethodNotAllowed(_) => "Method not allowed".to_string(),
            Self::MalformedBody(_) => "Invalid request body".to_string(),
            Self::PayloadTooLarge { .. } => "Request body too large".to_string(),
            Self::Validation(err) => err.public_message(),
            Self::Internal(_) => "Database insert failed".to_string(),
        }
    }
}

/// Persistence collaborator errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store answered with a non-success status
    #[error("store rejected insert (status {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Store unreachable
    #[error("store transport error: {0}")]
    Transport(String),

    /// Row could not be encoded
    #[error("row encoding failed: {0}")]
    Encoding(String),
}

impl StoreError {
    /// Whether a retry could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::Encoding(_) => false,
        }
    }
}

/// Notification collaborator errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Provider answered with a non-success status
    #[error("notification rejected (status {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Provider unreachable
    #[error("notification transport error: {0}")]
    Transport(String),
}

/// Startup configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required setting absent or blank
    #[error("missing configuration: {0}")]
    Missing(&'static str),

    /// Setting present but unusable
    #[error("invalid configuration for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
