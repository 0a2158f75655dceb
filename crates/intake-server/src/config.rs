//! Service configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default table for accepted requests
pub const DEFAULT_TABLE: &str = "setup_requests";

/// Default notification sender
pub const DEFAULT_NOTIFY_FROM: &str = "Axinite <no-reply@axinite.vercel.app>";

/// Default notification provider endpoint
pub const DEFAULT_NOTIFY_ENDPOINT: &str = "https://api.resend.com/emails";

/// Intake service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Persistence settings
    pub store: StoreConfig,
    /// Notification settings; `None` disables notifications
    pub notify: Option<NotifyConfig>,
    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,
}

impl IntakeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With listen address
    #[inline]
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// With persistence settings
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// With notification settings
    #[inline]
    #[must_use]
    pub fn with_notify(mut self, notify: Option<NotifyConfig>) -> Self {
        self.notify = notify;
        self
    }

    /// With outbound request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Check that everything needed to accept requests is present
    ///
    /// # Errors
    /// [`ConfigError`] naming the first missing or unusable setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.url.trim().is_empty() {
            return Err(ConfigError::Missing("SUPABASE_URL"));
        }
        if !self.store.url.starts_with("http://") && !self.store.url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "SUPABASE_URL",
                reason: format!("expected an http(s) URL, got {:?}", self.store.url),
            });
        }
        if self.store.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("SUPABASE_ANON_KEY"));
        }
        if self.store.table.trim().is_empty() {
            return Err(ConfigError::Missing("table"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "request_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            store: StoreConfig::default(),
            notify: None,
            request_timeout_secs: 10,
        }
    }
}

/// REST store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Key sent as `apikey` and bearer token
    pub api_key: String,
    /// Target table
    pub table: String,
}

impl StoreConfig {
    /// Store settings for `url` with `api_key`
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// With target table
    #[inline]
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Insert endpoint for the configured table
    #[must_use]
    pub fn insert_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), self.table)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

/// Email notification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyConfig {
    pub api_key: String,
    pub to: String,
    pub from: String,
    pub endpoint: String,
}

impl NotifyConfig {
    /// Notification settings, present only when both the key and the
    /// destination address are non-blank
    #[must_use]
    pub fn from_parts(api_key: Option<String>, to: Option<String>) -> Option<Self> {
        let api_key = api_key.filter(|k| !k.trim().is_empty())?;
        let to = to.filter(|t| !t.trim().is_empty())?;
        Some(Self {
            api_key,
            to,
            from: DEFAULT_NOTIFY_FROM.to_string(),
            endpoint: DEFAULT_NOTIFY_ENDPOINT.to_string(),
        })
    }

    /// With sender address
    #[inline]
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// With provider endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}
