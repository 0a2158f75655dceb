//! HTTP surface
//!
//! `/api/setup` accepts every method so that non-POST requests still get a
//! JSON 405 body from the service instead of axum's empty default.

use crate::error::IntakeError;
use crate::record::RequestMeta;
use crate::service::IntakeService;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, ConnectInfo, DefaultBodyLimit, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

/// Intake endpoint path
pub const INTAKE_PATH: &str = "/api/setup";

/// Health probe path
pub const HEALTH_PATH: &str = "/healthz";

/// Largest accepted intake body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

/// Failure body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Health body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

impl From<BytesRejection> for IntakeError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge {
                limit: MAX_BODY_BYTES,
            }
        } else {
            Self::MalformedBody(rejection.body_text())
        }
    }
}

/// Router with the intake and health routes
pub fn router(service: IntakeService) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(healthz))
        .route(INTAKE_PATH, any(intake))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(Arc::new(service))
}

/// Serve until the listener fails
///
/// # Errors
/// I/O errors from the listener.
pub async fn serve(listener: TcpListener, service: IntakeService) -> std::io::Result<()> {
    let app = router(service).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app).await
}

async fn healthz() -> (StatusCode, Json<Health>) {
    (
        StatusCode::OK,
        Json(Health {
            status: "ok".to_string(),
        }),
    )
}

async fn intake(
    State(service): State<Arc<IntakeService>>,
    method: Method,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let meta = RequestMeta::from_headers(&headers, peer.map(|ConnectInfo(addr)| addr));
    let span = tracing::info_span!("setup_request", %request_id, %method);

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            span.in_scope(|| tracing::warn!(error = %rejection, "intake body rejected"));
            return IntakeError::from(rejection).into_response();
        }
    };

    match service.handle(&method, meta, &body).instrument(span).await {
        Ok(_) => (StatusCode::OK, Json(Ack { ok: true })).into_response(),
        Err(err) => err.into_response(),
    }
}
