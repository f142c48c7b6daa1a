//! BeatHub Preview - serves the UrBeatHub web app with share metadata.
//!
//! This crate hosts the built single-page app and, for share links, rewrites
//! its entry document so link-preview crawlers (chat apps, social platforms)
//! see Open Graph and Twitter Card tags for the shared beat.
//!
//! # Architecture
//!
//! - **Slug**: Extracts the beat's store key from the end of the share slug
//! - **Store**: Looks the beat up in Firestore (or local fixtures)
//! - **Render**: Builds the tags with maud and splices them into `index.html`
//! - **Routes**: Share route, SPA fallback and static assets on axum
//!
//! # URL Pattern
//!
//! ```text
//! GET /addToCart/{title-words}-{beatId}
//! ```
//!
//! A known beat gets its title, cover and canonical URL. An unknown beat gets
//! fixed "Beat Not Found" metadata with a placeholder image. A store outage is
//! a `500`. Every page is sent with `Cache-Control: no-store`.
//!
//! # Security
//!
//! - All record fields are HTML-escaped by maud before insertion
//! - Cover URLs must be `http(s)://`, otherwise the placeholder image is used

pub mod config;
pub mod document;
pub mod error;
pub mod render;
pub mod resolve;
pub mod routes;
pub mod slug;
pub mod state;
pub mod store;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
