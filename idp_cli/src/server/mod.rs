//! The HTTP facade: inbound extraction endpoint (`§6.1`), upload-grant
//! surface (`§6.3`), plus health/schema endpoints carried over from the
//! teacher's ambient-stack conventions.
//!
//! Route names mirror the three HTTP API routes the original CDK stack wired
//! to separate Lambdas (`infra/constructs/api.py`): `/url` (presigned
//! upload), `/attributes` (the synchronous extraction call — `idp_text_lambda`
//! there, this crate's one orchestrator here). `/textract` has no
//! counterpart: its Lambda is the OCR collaborator `OCR_THEN_TEXT_LLM`
//! delegates to through `idp_orchestrator::OcrPort`, out of scope here (`§1`).
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial axum router + handlers.

pub mod handlers;

use tower_http::trace::TraceLayer;

/// Builds the full axum router over a shared [`crate::wiring::AppState`].
pub fn build_router(state: std::sync::Arc<crate::wiring::AppState>) -> axum::Router {
    axum::Router::new()
        .route("/healthz", axum::routing::get(handlers::healthz))
        .route("/schema", axum::routing::get(handlers::schema))
        .route("/attributes", axum::routing::post(handlers::extract))
        .route("/url", axum::routing::post(handlers::issue_upload_grant))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
