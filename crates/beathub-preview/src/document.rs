//! Provider for the single-page app's entry document (`index.html`).
//!
//! The document is either read once at startup and shared, or re-read on
//! every request. Callers only see [`BaseDocument::load`].

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::PreviewError;

/// Source of the SPA entry markup.
#[derive(Debug, Clone)]
pub enum BaseDocument {
    /// Read at startup. A failed read is kept so every request fails the same way.
    Preloaded {
        /// Where the document was read from.
        path: PathBuf,
        /// Document text, or the error from the startup read.
        html: Result<Arc<str>, Arc<io::Error>>,
    },
    /// Read from disk on each request.
    PerRequest {
        /// Document path.
        path: PathBuf,
    },
}

impl BaseDocument {
    /// Read `path` once now and serve that copy for the lifetime of the process.
    ///
    /// A missing or unreadable file is logged as an error here; requests
    /// then fail with [`PreviewError::MissingBaseDocument`].
    pub async fn preload(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let html = match tokio::fs::read_to_string(&path).await {
            Ok(html) => {
                tracing::info!(path = %path.display(), bytes = html.len(), "base document loaded");
                Ok(Arc::from(html))
            }
            Err(err) => {
                tracing::error!(
                    path = %path.display(),
                    error = %err,
                    "base document missing; every page request will fail until redeployed"
                );
                Err(Arc::new(err))
            }
        };
        Self::Preloaded { path, html }
    }

    /// Re-read `path` on every request.
    ///
    /// The file is checked once up front so a broken deployment is visible
    /// in the startup logs.
    pub async fn per_request(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                tracing::info!(path = %path.display(), "base document will be read per request");
            }
            Ok(_) => {
                tracing::error!(path = %path.display(), "base document path is not a file");
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "base document missing");
            }
        }
        Self::PerRequest { path }
    }

    /// Wrap markup already in memory.
    pub fn from_html(html: impl Into<Arc<str>>) -> Self {
        Self::Preloaded {
            path: PathBuf::from("<memory>"),
            html: Ok(html.into()),
        }
    }

    /// Path the document comes from.
    pub fn path(&self) -> &Path {
        match self {
            Self::Preloaded { path, .. } | Self::PerRequest { path } => path,
        }
    }

    /// Get the current document text.
    pub async fn load(&self) -> Result<Arc<str>, PreviewError> {
        match self {
            Self::Preloaded { path, html } => html.clone().map_err(|source| {
                PreviewError::MissingBaseDocument {
                    path: path.clone(),
                    source,
                }
            }),
            Self::PerRequest { path } => tokio::fs::read_to_string(path)
                .await
                .map(Arc::from)
                .map_err(|err| PreviewError::MissingBaseDocument {
                    path: path.clone(),
                    source: Arc::new(err),
                }),
        }
    }
}
