//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::{Config, StoreConfig};
use crate::document::BaseDocument;
use crate::store::{FirestoreStore, MemoryStore, RecordStore};

/// Shared application state available to all request handlers.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Where beats are looked up.
    pub store: Arc<dyn RecordStore>,

    /// The app's entry document.
    pub document: Arc<BaseDocument>,
}

impl AppState {
    /// Assemble state from already-built parts.
    pub fn new(config: Config, store: Arc<dyn RecordStore>, document: BaseDocument) -> Self {
        Self {
            config: Arc::new(config),
            store,
            document: Arc::new(document),
        }
    }

    /// Create the store and base document described by `config`.
    ///
    /// A missing base document is not an error here: it is logged and then
    /// reported on every request, so the health check can surface it.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn RecordStore> = match &config.store {
            StoreConfig::Firestore(firestore) => Arc::new(FirestoreStore::from_config(firestore)?),
            StoreConfig::Fixtures(path) => Arc::new(MemoryStore::from_json_file(path)?),
        };

        let document = if config.reload_index {
            BaseDocument::per_request(&config.index_path).await
        } else {
            BaseDocument::preload(&config.index_path).await
        };

        tracing::info!(
            store = store.name(),
            index_path = %document.path().display(),
            "application state initialized"
        );

        Ok(Self::new(config, store, document))
    }
}
