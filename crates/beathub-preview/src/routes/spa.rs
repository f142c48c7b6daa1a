//! Single-page app entry point.
//!
//! Every path without a share route or a static file gets the entry
//! document verbatim; the client-side router takes it from there.

use axum::extract::State;
use axum::response::Response;

use crate::error::PreviewError;
use crate::state::AppState;

/// Serve the unmodified entry document.
pub async fn spa_handler(State(state): State<AppState>) -> Result<Response, PreviewError> {
    let base = state.document.load().await?;
    Ok(super::html_response(base.to_string()))
}
