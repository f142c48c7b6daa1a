//! Share slug resolution.
//!
//! Turns the `{slug}` of `/addToCart/{slug}` into a lookup key and fetches the
//! matching beat. A missing beat is `Ok(None)`; only store failures are errors.

use crate::error::PreviewError;
use crate::slug::extract_key;
use crate::store::{Record, RecordStore, StoreError};

/// Look up the record for `key`.
///
/// Empty keys (from slugs ending in `-`) are treated as absent without
/// querying the store.
pub async fn resolve(store: &dyn RecordStore, key: &str) -> Result<Option<Record>, StoreError> {
    if key.is_empty() {
        return Ok(None);
    }
    store.get(key).await
}

/// Extract the key from `slug` and look it up.
///
/// Store failures come back as [`PreviewError::Store`] carrying both the
/// key and the slug for the logs.
pub async fn resolve_slug(
    store: &dyn RecordStore,
    slug: &str,
) -> Result<Option<Record>, PreviewError> {
    let key = extract_key(slug);

    match resolve(store, key).await {
        Ok(Some(record)) => {
            tracing::debug!(slug = %slug, key = %key, store = store.name(), "record found");
            Ok(Some(record))
        }
        Ok(None) => {
            tracing::debug!(slug = %slug, key = %key, store = store.name(), "record not found");
            Ok(None)
        }
        Err(source) => Err(PreviewError::Store {
            key: key.to_string(),
            slug: slug.to_string(),
            source,
        }),
    }
}
