//! Route definitions for the preview service.
//!
//! ## Routes
//!
//! - `GET /addToCart/{slug}` - App entry document with share metadata
//! - `GET /health` - Health check (JSON)
//! - `GET /`, `GET /index.html` - App entry document, unmodified
//! - anything else - Static file from the build directory, or the entry document

mod health;
mod share;
mod spa;

use axum::Router;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::services::ServeDir;

use crate::error::NO_STORE;
use crate::state::AppState;

/// Route pattern for share links.
pub const SHARE_ROUTE: &str = "/addToCart/{slug}";

/// Build the complete preview service router.
pub fn router(state: AppState) -> Router {
    // Unknown paths fall through to the app so client-side routing works.
    let spa_fallback = get(spa::spa_handler).with_state::<()>(state.clone());
    let assets = ServeDir::new(&state.config.static_dir)
        .append_index_html_on_directories(false)
        .fallback(spa_fallback);

    Router::new()
        .route("/", get(spa::spa_handler))
        .route("/index.html", get(spa::spa_handler))
        .route("/health", get(health::health_check))
        .route(SHARE_ROUTE, get(share::share_handler))
        .fallback_service(assets)
        .with_state(state)
}

/// Build an HTML response that intermediaries and browsers must not store.
fn html_response(html: String) -> Response {
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            ),
            (header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE)),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        ],
        html,
    )
        .into_response()
}
