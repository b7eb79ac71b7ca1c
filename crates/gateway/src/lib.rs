//! REST surface over the fingerprint service.
//!
//! Routes:
//! - `GET /holloman/v2/capabilities` -> JSON `ServiceCapabilities`
//! - `POST /holloman/v2/hh128` (multipart, file field `holloman-data`) ->
//!   JSON `BufferResponse`; the label is the filename basename up to the
//!   first `.`.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use holloman::{BufferRequest, FingerprintError, Service};

/// Multipart field carrying the buffer.
const DATA_FIELD: &str = "holloman-data";
/// Upper bound on request bodies. The projected image, not the wire payload,
/// is the real memory ceiling per request.
const MAX_BODY: usize = 1 << 30;

pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/holloman/v2/capabilities", get(capabilities))
        .route("/holloman/v2/hh128", post(hh128))
        .layer(DefaultBodyLimit::max(MAX_BODY))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn capabilities(State(service): State<Arc<Service>>) -> Response {
    Json(service.capabilities()).into_response()
}

async fn hh128(
    State(service): State<Arc<Service>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut request: Option<BufferRequest> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some(DATA_FIELD) {
            continue;
        }
        let label = field.file_name().map(label_from_filename);
        let buffer = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?
            .to_vec();
        request = Some(BufferRequest { buffer, label });
        break;
    }
    let request = request
        .ok_or_else(|| ApiError::bad_request(format!("missing multipart field {DATA_FIELD}")))?;

    // The core is CPU-bound with no suspension points; keep it off the
    // async workers.
    let response = tokio::task::spawn_blocking(move || service.cluster_buffer(&request))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))??;
    Ok(Json(response).into_response())
}

/// Basename up to the first `.`.
fn label_from_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.split('.').next().unwrap_or(base).to_string()
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: String) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message }
    }

    fn internal(message: String) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message }
    }
}

impl From<FingerprintError> for ApiError {
    fn from(err: FingerprintError) -> Self {
        let status = match &err {
            FingerprintError::BufferTooSmall { .. } => StatusCode::BAD_REQUEST,
            FingerprintError::Projection(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self { status, message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
