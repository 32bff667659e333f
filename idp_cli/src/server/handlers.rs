//! Request handlers for the HTTP facade.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial extract/url/healthz/schema handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::wiring::AppState;

type SharedState = std::sync::Arc<AppState>;

/// `POST /attributes`: runs one batch to completion and returns its
/// `BatchResult` with HTTP 200 regardless of per-document errors (`§6.1`).
/// Only a pre-fan-out failure — a malformed request, or an orchestrator
/// internal error — produces a non-200 response.
pub async fn extract(
    State(state): State<SharedState>,
    Json(request): Json<idp_core::domain::ExtractionRequest>,
) -> std::result::Result<Json<idp_core::domain::BatchResult>, (StatusCode, Json<ErrorBody>)> {
    match state.orchestrator.run_batch(request).await {
        std::result::Result::Ok(batch_result) => std::result::Result::Ok(Json(batch_result)),
        std::result::Result::Err(err) => std::result::Result::Err(error_response(err)),
    }
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    kind: idp_core::ErrorKind,
    message: String,
}

fn error_response(err: idp_core::IdpError) -> (StatusCode, Json<ErrorBody>) {
    let status = match err.kind() {
        idp_core::ErrorKind::MalformedRequest => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let info = err.into_error_info();
    (status, Json(ErrorBody { kind: info.kind, message: info.message }))
}

#[derive(serde::Deserialize)]
pub struct UploadGrantRequest {
    file_name: String,
}

#[derive(serde::Serialize)]
pub struct UploadGrantResponse {
    post: PostFields,
}

#[derive(serde::Serialize)]
struct PostFields {
    url: String,
    fields: std::collections::BTreeMap<String, String>,
}

/// Default TTL offered to callers; the store clamps it up to the port's
/// documented 5-minute floor regardless.
const DEFAULT_UPLOAD_GRANT_TTL: std::time::Duration = std::time::Duration::from_secs(15 * 60);

/// `POST /url`: issues a short-lived upload grant keyed under
/// `originals/<file_name>` (`§6.2`, `§6.3`).
pub async fn issue_upload_grant(
    State(state): State<SharedState>,
    Json(request): Json<UploadGrantRequest>,
) -> std::result::Result<Json<UploadGrantResponse>, (StatusCode, Json<ErrorBody>)> {
    let key = std::format!("originals/{}", request.file_name);
    match state.store.issue_upload_grant(&key, DEFAULT_UPLOAD_GRANT_TTL).await {
        std::result::Result::Ok(grant) => std::result::Result::Ok(Json(UploadGrantResponse {
            post: PostFields { url: grant.url, fields: grant.fields },
        })),
        std::result::Result::Err(err) => std::result::Result::Err(error_response(err)),
    }
}

/// `GET /healthz`: liveness probe; always `200 OK` once the process is
/// serving requests.
pub async fn healthz() -> &'static str {
    "ok"
}

/// `GET /schema`: the JSON Schema for the inbound extraction request,
/// generated from the same types the request is deserialized into so the
/// two can never drift.
pub async fn schema() -> Json<schemars::schema::RootSchema> {
    Json(schemars::schema_for!(idp_core::domain::ExtractionRequest))
}
