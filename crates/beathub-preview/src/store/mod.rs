//! Record store abstraction.
//!
//! The preview service only ever reads a single beat by its document ID.
//! [`RecordStore`] captures that capability so the share route can run
//! against Firestore in production and an in-memory fixture set locally.

pub mod firestore;
pub mod memory;

use async_trait::async_trait;
use serde::Deserialize;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// A beat as stored in the `beats` collection.
///
/// Only the fields used for link previews are modeled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    /// Beat title as shown in the store.
    pub title: String,
    /// Absolute URL of the cover artwork.
    #[serde(default, rename = "coverUrl")]
    pub cover_url: Option<String>,
}

impl Record {
    /// Create a record with a cover image.
    pub fn new(title: impl Into<String>, cover_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cover_url: Some(cover_url.into()),
        }
    }
}

/// Infrastructure failure while talking to the record store.
///
/// A missing record is not an error; it is `Ok(None)` from [`RecordStore::get`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a status other than success or not-found.
    #[error("store returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First part of the response body, for diagnosis.
        body: String,
    },

    /// The response could not be interpreted as a record.
    #[error("malformed store response: {0}")]
    Malformed(String),

    /// Credentials for the store could not be obtained.
    #[error("store credentials unavailable: {0}")]
    Credentials(String),
}

/// Read-only access to beats by key.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name used in logs (e.g. "firestore").
    fn name(&self) -> &'static str;

    /// Look up a record by its store-native key.
    ///
    /// Returns `Ok(None)` when no record exists for `key`.
    async fn get(&self, key: &str) -> Result<Option<Record>, StoreError>;
}
