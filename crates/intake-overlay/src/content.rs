//! Document-viewer content
//!
//! Opening the document viewer with a content type produces a
//! [`ContentRequest`]. The host resolves it against a [`ContentSource`]
//! outside the controller and hands the [`ContentResponse`] back. Each
//! request carries a [`ContentToken`]; the controller forgets the token when
//! the overlay closes, so a response that arrives late is dropped.

use crate::error::ContentError;

/// Text shown while a document loads
pub const LOADING_PLACEHOLDER: &str = "Fetching system artifact...";

/// Label used for documents without a dedicated title
pub const DEFAULT_LABEL: &str = "DOCUMENTATION";

const LABELS: &[(&str, &str)] = &[
    ("ads-integration-readme.md", "INTEGRATION README"),
    ("ads-commercial-terms.md", "COMMERCIAL TERMS"),
    ("ads-privacy-policy.md", "PRIVACY POLICY"),
    ("ads-terms-of-service.md", "TERMS OF SERVICE"),
];

/// Human title for a document path
#[must_use]
pub fn label_for(content_type: &str) -> &'static str {
    LABELS
        .iter()
        .find(|(file, _)| *file == content_type)
        .map_or(DEFAULT_LABEL, |&(_, label)| label)
}

/// Text rendered when a document cannot be loaded
#[must_use]
pub fn not_found_message(path: &str) -> String {
    format!("ERROR 404: [{path}] not found in repository.")
}

/// Handle for one pending document load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentToken(pub(crate) u64);

impl ContentToken {
    /// Raw value
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Document load the host has to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub token: ContentToken,
    pub path: String,
}

impl ContentRequest {
    /// Fetch the document through `source`
    pub async fn resolve<S: ContentSource + ?Sized>(self, source: &S) -> ContentResponse {
        let result = source.fetch(&self.path).await;
        if let Err(err) = &result {
            tracing::warn!(path = %self.path, error = %err, "document load failed");
        }
        ContentResponse {
            token: self.token,
            path: self.path,
            result,
        }
    }
}

/// Outcome of a document load, ready to hand back to the controller
#[derive(Debug, Clone)]
pub struct ContentResponse {
    pub token: ContentToken,
    pub path: String,
    pub result: Result<String, ContentError>,
}

impl ContentResponse {
    /// Text to render: trimmed document or the not-found message
    #[must_use]
    pub fn display_text(&self) -> String {
        match &self.result {
            Ok(text) => text.trim().to_string(),
            Err(_) => not_found_message(&self.path),
        }
    }
}

/// Where document text comes from
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// Load the document at a relative path
    async fn fetch(&self, path: &str) -> Result<String, ContentError>;
}

/// Fetches documents relative to a base URL
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: reqwest::Client,
    base: reqwest::Url,
}

impl HttpContentSource {
    /// Create source rooted at `base` (should end with `/`)
    #[must_use]
    pub fn new(client: reqwest::Client, base: reqwest::Url) -> Self {
        Self { client, base }
    }
}

#[async_trait::async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(&self, path: &str) -> Result<String, ContentError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| ContentError::transport(path, e.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ContentError::transport(path, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::NotFound {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ContentError::transport(path, e.to_string()))
    }
}
