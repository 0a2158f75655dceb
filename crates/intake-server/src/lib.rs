//! Intake Server - setup request endpoint
//!
//! Accepts setup requests over HTTP, validates them with
//! [`intake_form::validate`], records one row per accepted request through a
//! [`RequestStore`] and optionally emails the operator through a
//! [`Notifier`].

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod notify;
pub mod record;
pub mod routes;
pub mod service;
pub mod store;
pub mod telemetry;

pub use config::{IntakeConfig, NotifyConfig, StoreConfig};
pub use error::{ConfigError, IntakeError, NotifyError, StoreError};
pub use notify::{Notification, Notifier, ResendNotifier};
pub use record::{PersistedRequest, RequestMeta};
pub use routes::{router, serve, Ack, ErrorBody, INTAKE_PATH, MAX_BODY_BYTES};
pub use service::IntakeService;
pub use store::{RequestStore, RestStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
