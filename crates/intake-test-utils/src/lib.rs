//! Testing utilities for the intake workspace
//!
//! Shared fixtures, recording fakes for the collaborator traits, and a
//! helper that runs the intake router on an ephemeral port.

#![allow(missing_docs)]

use intake_form::{SubmissionPayload, ValidatedPayload};
use intake_overlay::dom::{ElementKind, ElementSpec, MemoryDocument, Slot};
use intake_overlay::triggers::{CLOSE_ATTR, CONTENT_ATTR, OPEN_ATTR};
use intake_overlay::{ContentError, ContentSource, OverlayController, SubmitError, SubmitTransport};
use intake_server::{IntakeService, Notification, Notifier, NotifyError, PersistedRequest, RequestStore, StoreError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const SETUP_OVERLAY: &str = "setup-overlay";
pub const SUCCESS_OVERLAY: &str = "success-overlay";
pub const README_OVERLAY: &str = "readme-overlay";
pub const PAGE_CTA: &str = "request-setup";
pub const TERMS_LINK: &str = "terms-link";
pub const TERMS_FILE: &str = "ads-terms-of-service.md";

/// The reference submission: every field valid, both consents given
pub fn jane_payload() -> SubmissionPayload {
    SubmissionPayload::new("Jane", "jane@co.com", "Web", "Foundation").with_consents(true, true)
}

/// [`jane_payload`] as the JSON body a browser would send
pub fn jane_json() -> serde_json::Value {
    serde_json::json!({
        "name": "Jane",
        "email": "jane@co.com",
        "platform": "Web",
        "outcome": "Foundation",
        "consent_files": true,
        "consent_data": true,
        "submitted_at": "2026-10-17T09:30:00Z"
    })
}

/// Landing page with the setup form, success and document overlays
///
/// `request-setup` opens the form, `terms-link` opens the document viewer
/// on the terms of service. The form's focusable controls run from
/// `setup-name` to `setup-submit`; the dismiss button is out of tab order.
pub fn setup_page() -> MemoryDocument {
    let mut doc = MemoryDocument::new();
    doc.insert(ElementSpec::new("hero", ElementKind::Generic).at_offset(0.0))
        .insert(ElementSpec::new(PAGE_CTA, ElementKind::Button).attr(OPEN_ATTR, SETUP_OVERLAY))
        .insert(ElementSpec::new("pricing", ElementKind::Generic).at_offset(1400.0))
        .insert(
            ElementSpec::new(TERMS_LINK, ElementKind::Anchor)
                .with_href()
                .attr(OPEN_ATTR, README_OVERLAY)
                .attr(CONTENT_ATTR, TERMS_FILE),
        )
        .insert(ElementSpec::overlay(SETUP_OVERLAY))
        .insert(ElementSpec::new("setup-panel", ElementKind::Generic).under(SETUP_OVERLAY))
        .insert(ElementSpec::new("setup-name", ElementKind::Input).under("setup-panel"))
        .insert(ElementSpec::new("setup-email", ElementKind::Input).under("setup-panel"))
        .insert(ElementSpec::new("setup-platform", ElementKind::Select).under("setup-panel"))
        .insert(
            ElementSpec::new("setup-terms", ElementKind::Anchor)
                .under("setup-panel")
                .with_href()
                .attr(OPEN_ATTR, README_OVERLAY)
                .attr(CONTENT_ATTR, TERMS_FILE),
        )
        .insert(ElementSpec::new("setup-submit", ElementKind::Button).under("setup-panel"))
        .insert(
            ElementSpec::new("setup-dismiss", ElementKind::Button)
                .under(SETUP_OVERLAY)
                .tab_index(-1)
                .attr(CLOSE_ATTR, ""),
        )
        .insert(ElementSpec::overlay(SUCCESS_OVERLAY))
        .insert(
            ElementSpec::new("success-close", ElementKind::Button)
                .under(SUCCESS_OVERLAY)
                .attr(CLOSE_ATTR, ""),
        )
        .insert(ElementSpec::overlay(README_OVERLAY))
        .insert(
            ElementSpec::new("readme-close", ElementKind::Button)
                .under(README_OVERLAY)
                .attr(CLOSE_ATTR, ""),
        )
        .with_slot(SUCCESS_OVERLAY, Slot::Body)
        .with_slot(README_OVERLAY, Slot::Label)
        .with_slot(README_OVERLAY, Slot::Body)
        .with_download_link(README_OVERLAY);
    doc
}

/// Controller over [`setup_page`] with the page CTA focused
pub fn setup_overlays() -> OverlayController<MemoryDocument> {
    setup_overlays_at(0.0)
}

/// Like [`setup_overlays`], with the page already scrolled to `scroll_y`
pub fn setup_overlays_at(scroll_y: f64) -> OverlayController<MemoryDocument> {
    use intake_overlay::Document;

    let mut doc = setup_page();
    doc.set_scroll_y(scroll_y);
    doc.focus(&PAGE_CTA.into());
    OverlayController::new(doc)
}

/// Store that keeps every inserted row in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    rows: Arc<Mutex<Vec<PersistedRequest>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<PersistedRequest> {
        self.rows.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

#[async_trait::async_trait]
impl RequestStore for RecordingStore {
    async fn insert(&self, row: &PersistedRequest) -> Result<(), StoreError> {
        self.rows.lock().push(row.clone());
        Ok(())
    }
}

/// Store that rejects every insert with `status`
#[derive(Debug, Clone, Copy)]
pub struct FailingStore {
    pub status: u16,
}

#[async_trait::async_trait]
impl RequestStore for FailingStore {
    async fn insert(&self, _row: &PersistedRequest) -> Result<(), StoreError> {
        Err(StoreError::Rejected {
            status: self.status,
            body: "permission denied for table setup_requests".to_string(),
        })
    }
}

/// Notifier that records rendered notifications, optionally failing after
/// recording
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, row: &PersistedRequest) -> Result<(), NotifyError> {
        self.sent.lock().push(Notification::for_request(row));
        if self.fail {
            return Err(NotifyError::Rejected {
                status: 422,
                body: "domain not verified".to_string(),
            });
        }
        Ok(())
    }
}

/// Submit transport that records payloads and answers from a fixed script
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    sent: Arc<Mutex<Vec<ValidatedPayload>>>,
    reject: Option<(u16, String)>,
}

impl ScriptedTransport {
    /// Accept every submission
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Reject every submission with `status` and an `{error}` message
    pub fn rejecting(status: u16, message: impl Into<String>) -> Self {
        Self {
            reject: Some((status, message.into())),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<ValidatedPayload> {
        self.sent.lock().clone()
    }
}

#[async_trait::async_trait]
impl SubmitTransport for ScriptedTransport {
    async fn send(&self, payload: &ValidatedPayload) -> Result<(), SubmitError> {
        self.sent.lock().push(payload.clone());
        match &self.reject {
            None => Ok(()),
            Some((status, message)) => Err(SubmitError::Rejected {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Document source backed by a map; unknown paths are 404s
#[derive(Debug, Clone, Default)]
pub struct StaticContentSource {
    docs: HashMap<String, String>,
}

impl StaticContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_doc(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.docs.insert(path.into(), text.into());
        self
    }
}

#[async_trait::async_trait]
impl ContentSource for StaticContentSource {
    async fn fetch(&self, path: &str) -> Result<String, ContentError> {
        self.docs.get(path).cloned().ok_or_else(|| ContentError::NotFound {
            path: path.to_string(),
            status: 404,
        })
    }
}

/// Intake router running on an ephemeral local port
#[derive(Debug)]
pub struct TestServer {
    pub addr: SocketAddr,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    /// Bind `127.0.0.1:0` and serve `service` in the background
    pub async fn spawn(service: IntakeService) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(intake_server::serve(listener, service));
        Self { addr, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
