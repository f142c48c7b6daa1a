//! In-memory record store backed by a JSON fixture file.
//!
//! Used for local development of the SPA without Firestore credentials, and
//! by the test suite.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;

use super::{Record, RecordStore, StoreError};

/// Immutable map of key → record.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, Record>,
}

impl MemoryStore {
    /// Build a store from `(key, record)` pairs.
    pub fn from_records<K: Into<String>>(records: impl IntoIterator<Item = (K, Record)>) -> Self {
        Self {
            records: records.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }

    /// Load fixtures from a JSON object of the form
    /// `{ "<key>": { "title": "...", "coverUrl": "..." } }`.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixtures from {}", path.display()))?;
        let records: HashMap<String, Record> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing fixtures in {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "loaded fixture records"
        );

        Ok(Self { records })
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Record>, StoreError> {
        Ok(self.records.get(key).cloned())
    }
}
