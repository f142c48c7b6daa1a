//! Share link route handler.
//!
//! Handles `GET /addToCart/{slug}`, where `slug` is a readable beat title
//! ending in the beat's store ID (e.g. `night-drive-Xy12abC`).

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;

use crate::error::PreviewError;
use crate::render;
use crate::resolve;
use crate::state::AppState;

/// Serve the app with share metadata for the beat named by `slug`.
///
/// 1. Loads the entry document (fails closed if the build is missing)
/// 2. Resolves the slug's trailing key against the record store
/// 3. Injects beat metadata, or the "not found" metadata, into the head
///
/// A store failure is a 500 with a generic page; nothing partial is sent.
/// A slug that does not decode to UTF-8 is a 400.
pub async fn share_handler(
    State(state): State<AppState>,
    slug: Result<Path<String>, PathRejection>,
) -> Result<Response, PreviewError> {
    let Path(slug) = slug?;
    let base = state.document.load().await?;

    let record = resolve::resolve_slug(state.store.as_ref(), &slug).await?;

    let html = render::build_document(record.as_ref(), &slug, &state.config.site, &base);

    Ok(super::html_response(html))
}
