//! Axum request handlers for the transfer protocol.
//!
//! Handlers forward to the [`DocumentStore`](crate::store::DocumentStore) and
//! translate its outcome into a status code. The envelope they carry is never
//! decoded or logged.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{ErrorResponse, HealthResponse, LoadResponse, SaveRequest, SaveResponse};
use common::ServiceError;
use tracing::{debug, info};

use super::state::AppState;

/// `POST /save`: store an envelope under a new name.
///
/// Returns `200` on success, `400` when the name or content is missing (or
/// the body is not JSON), `409` when the name is already taken, and `413`
/// when the body exceeds the configured limit.
pub async fn save(
    State(state): State<AppState>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(rejection) => return rejection_response(&rejection),
    };

    match state.store.save(&req.name, req.content).await {
        Ok(()) => {
            info!("document stored");
            let body = SaveResponse {
                message: "Document saved successfully".into(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            debug!(reason = %e, "save rejected");
            error_response(&ServiceError::from(e))
        }
    }
}

/// `GET /load/{name}`: hand out a stored envelope and forget it.
///
/// Returns `200 {"content": …}` exactly once per saved document; every later
/// request for the same name receives `404`.
pub async fn load(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.store.load(&name).await {
        Ok(content) => {
            info!("document released");
            (
                StatusCode::OK,
                [(header::CACHE_CONTROL, "no-store")],
                Json(LoadResponse { content }),
            )
                .into_response()
        }
        Err(e) => {
            debug!(reason = %e, "load rejected");
            error_response(&ServiceError::from(e))
        }
    }
}

/// `GET /health`: liveness check.
///
/// Always `200 OK` while the process is serving; reports how many documents
/// are waiting to be loaded.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        documents_stored: state.store.len().await,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Render a [`ServiceError`] as its status code and JSON error body.
fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

/// An unreadable body is a validation failure, except for an oversized one.
fn rejection_response(rejection: &JsonRejection) -> Response {
    let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::PayloadTooLarge("request body is too large".into())
    } else {
        ServiceError::Validation("Missing name or content".into())
    };
    debug!(reason = %rejection.body_text(), "unreadable save request");
    error_response(&err)
}
