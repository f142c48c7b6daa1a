//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    store: &'static str,
    base_document: &'static str,
}

/// Public health check endpoint.
///
/// Reports `503` when the entry document cannot be read, since every page
/// request would fail. The record store is not probed.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let document_ok = state.document.load().await.is_ok();

    let (status_code, status, base_document) = if document_ok {
        (StatusCode::OK, "ok", "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "missing")
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            service: "beathub-preview",
            version: env!("CARGO_PKG_VERSION"),
            store: state.store.name(),
            base_document,
        }),
    )
}
