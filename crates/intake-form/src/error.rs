//! Validation error taxonomy
//!
//! The same variants are produced on both sides of the wire. The browser
//! shows [`ValidationError::user_message`], the intake service answers with
//! [`ValidationError::public_message`].

/// Required submission fields, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Platform,
    Outcome,
}

/// Why a submission was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required field absent or blank after trimming
    #[error("missing required field: {0}")]
    MissingField(Field),

    /// Value outside the field's enumerated set
    #[error("invalid value for {field}: '{value}'")]
    InvalidEnum { field: Field, value: String },

    /// Email does not look like `local@domain.tld`
    #[error("invalid email address")]
    InvalidEmail,

    /// One or both consent flags not affirmed
    #[error("consent required")]
    ConsentRequired,
}

impl ValidationError {
    /// Message shown next to the form in the browser
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField(_) => {
                "Please fill required fields (name, email, platform, requested service)."
            }
            Self::InvalidEnum {
                field: Field::Platform,
                ..
            } => "Please choose Web, iOS or Android as the platform.",
            Self::InvalidEnum { .. } => "Please choose Foundation or Cleanup as the service.",
            Self::InvalidEmail => "Please enter a valid email address.",
            Self::ConsentRequired => {
                "Please confirm you have the rights and consent to share this information."
            }
        }
    }

    /// Message returned in the `error` field of a 400 response
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::MissingField(_) => "Missing required fields".to_string(),
            Self::InvalidEnum { field, .. } => format!("Invalid {field}"),
            Self::InvalidEmail => "Invalid email address".to_string(),
            Self::ConsentRequired => "Consent required".to_string(),
        }
    }

    /// The field the error points at, if it concerns a single field
    #[must_use]
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::MissingField(field) | Self::InvalidEnum { field, .. } => Some(*field),
            Self::InvalidEmail => Some(Field::Email),
            Self::ConsentRequired => None,
        }
    }
}
