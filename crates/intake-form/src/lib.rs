//! Intake Form - setup request payloads and their validation
//!
//! Shared by the browser-side submission client and the intake service:
//! - Raw [`SubmissionPayload`] as it arrives from a form or a JSON body
//! - Ordered, short-circuiting validation into a [`ValidatedPayload`]
//! - The advisory free-email-provider check (client-side policy gate)
//!
//! # Example
//!
//! ```rust
//! use intake_form::{validate, Platform, SubmissionPayload};
//!
//! let payload = SubmissionPayload::new("Jane", "jane@co.com", "Web", "Foundation")
//!     .with_consents(true, true);
//!
//! let validated = validate(&payload).unwrap();
//! assert_eq!(validated.platform, Platform::Web);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod advisory;
pub mod error;
pub mod payload;
pub mod validation;

pub use advisory::{advise, is_free_provider, Advisory, FREE_EMAIL_DOMAINS};
pub use error::{Field, ValidationError};
pub use payload::{Outcome, Platform, SubmissionPayload, ValidatedPayload};
pub use validation::{is_plausible_email, validate};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
