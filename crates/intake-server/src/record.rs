//! Persisted row
//!
//! One immutable row per accepted submission. `outcome` is written to the
//! `requested_service` column.

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use intake_form::{Outcome, Platform, ValidatedPayload};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Request details observed by the server, never supplied by the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// Extract meta from request headers, falling back to the peer address
    /// when no `x-forwarded-for` header is present.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let user_agent = headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            source_ip: forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())),
            user_agent,
        }
    }
}

/// Row written to the `setup_requests` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRequest {
    pub name: String,
    pub email: String,
    pub platform: Platform,
    pub figma_url: Option<String>,
    #[serde(rename = "requested_service")]
    pub outcome: Outcome,
    pub consent_files: bool,
    pub consent_data: bool,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PersistedRequest {
    /// Build a row from a validated payload
    #[must_use]
    pub fn new(payload: ValidatedPayload, meta: RequestMeta, created_at: DateTime<Utc>) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            platform: payload.platform,
            figma_url: payload.figma_url,
            outcome: payload.outcome,
            consent_files: payload.consent_files,
            consent_data: payload.consent_data,
            source_ip: meta.source_ip,
            user_agent: meta.user_agent,
            created_at,
        }
    }
}
