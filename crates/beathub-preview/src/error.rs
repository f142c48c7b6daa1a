//! Error types for the preview service.
//!
//! Errors are rendered as small HTML pages rather than JSON, since the
//! callers are browsers and link-preview crawlers. The pages carry no share
//! metadata and never expose internal detail.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};

use crate::store::StoreError;

/// `Cache-Control` value for everything this service renders.
pub const NO_STORE: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Preview service error type.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// The record store failed while looking up a beat.
    #[error("record lookup failed for key '{key}' (slug '{slug}'): {source}")]
    Store {
        /// Extracted record key.
        key: String,
        /// Share slug from the request path.
        slug: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// The app's entry document could not be read.
    #[error("base document {} unavailable: {source}", .path.display())]
    MissingBaseDocument {
        /// Path of the entry document.
        path: PathBuf,
        /// Read error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The share path could not be decoded (e.g. percent-encoded invalid UTF-8).
    #[error("invalid share path: {0}")]
    InvalidPath(#[from] PathRejection),
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        match &self {
            Self::Store { key, slug, source } => {
                tracing::error!(
                    key = %key,
                    slug = %slug,
                    route = "/addToCart/{slug}",
                    error = %source,
                    "record store failure"
                );
            }
            Self::MissingBaseDocument { path, source } => {
                tracing::error!(
                    path = %path.display(),
                    error = %source,
                    "base document unavailable"
                );
            }
            Self::InvalidPath(rejection) => {
                tracing::warn!(error = %rejection, "rejected share path");
            }
        }

        let (status, message) = match self {
            Self::InvalidPath(_) => (StatusCode::BAD_REQUEST, "The link you followed is not valid."),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong on our side. Please try again later.",
            ),
        };
        let heading = status.canonical_reason().unwrap_or("Error");

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="robots" content="noindex";
                    title { (heading) }
                }
                body {
                    h1 { (heading) }
                    p { (message) }
                }
            }
        };

        (
            status,
            [(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE))],
            markup,
        )
            .into_response()
    }
}
