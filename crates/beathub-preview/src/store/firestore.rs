//! Firestore REST backend.
//!
//! Reads single documents with
//! `GET /v1/projects/{project}/databases/{database}/documents/{collection}/{id}`.
//! A `404` whose error message names the document maps to `Ok(None)`. Any
//! other `404` (unknown project or database) and every other non-success
//! status is a store failure.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use super::{Record, RecordStore, StoreError};
use crate::config::FirestoreConfig;

/// Production Firestore endpoint.
const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

/// GCE / Cloud Run metadata server token endpoint for the default service account.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Metadata server tokens live for an hour; refresh well before that.
const TOKEN_TTL: Duration = Duration::from_secs(45 * 60);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest error body kept in [`StoreError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// Firestore's limit on document ID size, in bytes.
const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// How requests to Firestore are authorized.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// No `Authorization` header (the emulator accepts anything).
    None,
    /// Fixed bearer token, e.g. from `gcloud auth print-access-token`.
    Static(String),
    /// Fetch short-lived tokens from the metadata server at `token_url`.
    MetadataServer {
        /// Token endpoint URL.
        token_url: String,
    },
}

/// Firestore-backed [`RecordStore`].
pub struct FirestoreStore {
    client: reqwest::Client,
    /// `.../documents/{collection}`; the document ID is pushed as a segment.
    collection_url: Url,
    credentials: Credentials,
    token_cache: Cache<&'static str, Arc<str>>,
}

impl FirestoreStore {
    /// Build a store from configuration.
    ///
    /// Credential precedence: emulator (no auth), then a static access
    /// token, then the metadata server.
    pub fn from_config(config: &FirestoreConfig) -> anyhow::Result<Self> {
        let (base_url, credentials) = match (&config.emulator_host, &config.access_token) {
            (Some(host), _) => (format!("http://{host}"), Credentials::None),
            (None, Some(token)) => (FIRESTORE_BASE_URL.to_string(), Credentials::Static(token.clone())),
            (None, None) => (
                FIRESTORE_BASE_URL.to_string(),
                Credentials::MetadataServer {
                    token_url: METADATA_TOKEN_URL.to_string(),
                },
            ),
        };

        Self::with_base_url(&base_url, config, credentials)
    }

    /// Build a store against an explicit endpoint.
    pub fn with_base_url(
        base_url: &str,
        config: &FirestoreConfig,
        credentials: Credentials,
    ) -> anyhow::Result<Self> {
        let mut collection_url = Url::parse(base_url)?;
        collection_url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Firestore base URL cannot be a base: {base_url}"))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                config.project_id.as_str(),
                "databases",
                config.database.as_str(),
                "documents",
                config.collection.as_str(),
            ]);

        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("beathub-preview/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let token_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(TOKEN_TTL)
            .build();

        tracing::info!(
            collection_url = %collection_url,
            auth = credentials.kind(),
            "firestore store initialized"
        );

        Ok(Self {
            client,
            collection_url,
            credentials,
            token_cache,
        })
    }

    /// Full URL of the document with ID `key`.
    fn document_url(&self, key: &str) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(key);
        }
        url
    }

    /// Bearer token for the next request, if any.
    async fn bearer_token(&self) -> Result<Option<Arc<str>>, StoreError> {
        match &self.credentials {
            Credentials::None => Ok(None),
            Credentials::Static(token) => Ok(Some(Arc::from(token.as_str()))),
            Credentials::MetadataServer { token_url } => {
                let token = self
                    .token_cache
                    .try_get_with("default", fetch_metadata_token(&self.client, token_url))
                    .await
                    .map_err(|e| StoreError::Credentials(e.to_string()))?;
                Ok(Some(token))
            }
        }
    }
}

impl Credentials {
    fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Static(_) => "static-token",
            Self::MetadataServer { .. } => "metadata-server",
        }
    }
}

#[async_trait]
impl RecordStore for FirestoreStore {
    fn name(&self) -> &'static str {
        "firestore"
    }

    async fn get(&self, key: &str) -> Result<Option<Record>, StoreError> {
        // Firestore cannot hold such a document; asking would only earn a 400.
        if !is_valid_document_id(key) {
            tracing::debug!(key = %key, "not a valid Firestore document id");
            return Ok(None);
        }

        let mut request = self.client.get(self.document_url(key));
        if let Some(token) = self.bearer_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND && is_missing_document(&body) {
                return Ok(None);
            }
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let bytes = response.bytes().await?;
        let document: FirestoreDocument = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Malformed(format!("invalid document JSON: {e}")))?;

        document.into_record().map(Some)
    }
}

/// Firestore document resource (only the parts we read).
#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: HashMap<String, FirestoreValue>,
}

/// Typed Firestore value; non-string variants are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreValue {
    #[serde(default)]
    string_value: Option<String>,
}

impl FirestoreDocument {
    fn string_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name)?.string_value.as_deref()
    }

    fn into_record(self) -> Result<Record, StoreError> {
        let title = self
            .string_field("title")
            .ok_or_else(|| StoreError::Malformed("document has no string `title` field".into()))?
            .to_string();

        let cover_url = self
            .string_field("coverUrl")
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string);

        Ok(Record { title, cover_url })
    }
}

/// Google API error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorStatus,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    message: String,
}

/// Whether a `404` body reports a missing document, as opposed to a missing
/// project or database (`"The database (default) does not exist ..."`).
///
/// Firestore phrases the former as `Document "projects/.../beats/{id}" not found.`
fn is_missing_document(body: &str) -> bool {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| {
            let message = envelope.error.message;
            message.starts_with("Document ") && message.contains("not found")
        })
        .unwrap_or(false)
}

/// Metadata server token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

async fn fetch_metadata_token(
    client: &reqwest::Client,
    token_url: &str,
) -> Result<Arc<str>, StoreError> {
    let response = client
        .get(token_url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Status {
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    let token: TokenResponse = response.json().await?;
    tracing::debug!("fetched access token from metadata server");
    Ok(Arc::from(token.access_token))
}

/// Firestore document ID rules: non-empty, at most 1500 bytes, no `/`,
/// not `.` or `..`, and not of the reserved form `__*__`.
fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_DOCUMENT_ID_BYTES
        && !id.contains('/')
        && id != "."
        && id != ".."
        && !(id.len() >= 4 && id.starts_with("__") && id.ends_with("__"))
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
