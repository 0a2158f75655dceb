//! Notification collaborator
//!
//! After a row is recorded the operator gets one email summarizing it.
//! Delivery is best effort and never changes the intake response.

use crate::config::NotifyConfig;
use crate::error::NotifyError;
use crate::record::PersistedRequest;
use serde::Serialize;

/// Subject line of every notification
pub const SUBJECT: &str = "New Axinite Setup Request";

/// Shown in place of an absent Figma link
pub const NO_FIGMA: &str = "—";

/// Rendered notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub html: String,
}

impl Notification {
    /// Summary of an accepted request; user-supplied text is HTML-escaped
    #[must_use]
    pub fn for_request(row: &PersistedRequest) -> Self {
        let figma = row
            .figma_url
            .as_deref()
            .map_or_else(|| NO_FIGMA.to_string(), escape_html);

        let html = format!(
            "<strong>New setup request received</strong><br><br>\
             <b>Name:</b> {}<br>\
             <b>Email:</b> {}<br>\
             <b>Platform:</b> {}<br>\
             <b>Service:</b> {}<br>\
             <b>Figma:</b> {}",
            escape_html(&row.name),
            escape_html(&row.email),
            row.platform,
            row.outcome,
            figma,
        );

        Self {
            subject: SUBJECT.to_string(),
            html,
        }
    }
}

/// Escape text for inclusion in an HTML body
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Delivers operator notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Notify about one recorded request
    async fn notify(&self, row: &PersistedRequest) -> Result<(), NotifyError>;
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Resend-style email API
#[derive(Debug, Clone)]
pub struct ResendNotifier {
    client: reqwest::Client,
    config: NotifyConfig,
}

impl ResendNotifier {
    /// Create notifier from settings
    #[must_use]
    pub fn new(client: reqwest::Client, config: NotifyConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl Notifier for ResendNotifier {
    async fn notify(&self, row: &PersistedRequest) -> Result<(), NotifyError> {
        let notification = Notification::for_request(row);
        let request = EmailRequest {
            from: &self.config.from,
            to: &self.config.to,
            subject: &notification.subject,
            html: &notification.html,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }
}
