//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Default site name shown in titles and `og:site_name`.
pub const DEFAULT_SITE_NAME: &str = "UrBeatHub";

/// Default public host used for canonical share URLs.
pub const DEFAULT_SITE_HOST: &str = "urbeathub.com";

/// Placeholder preview image for beats without artwork.
pub const DEFAULT_IMAGE_URL: &str = "https://urbeathub.com/default_og.png";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Directory holding the built single-page app.
    pub static_dir: PathBuf,

    /// The app's entry document, normally `{static_dir}/index.html`.
    pub index_path: PathBuf,

    /// Re-read the entry document on every request instead of once at startup.
    pub reload_index: bool,

    /// Values used when building share metadata.
    pub site: SiteConfig,

    /// Where beats are looked up.
    pub store: StoreConfig,
}

/// Share metadata settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Site name, appended to page titles.
    pub site_name: String,

    /// Host for canonical URLs (`https://{site_host}/addToCart/{slug}`).
    pub site_host: String,

    /// Image used when no beat artwork is available.
    pub default_image_url: String,

    /// Emit `og:url`/`og:type` on the "beat not found" page as well.
    pub include_url_on_not_found: bool,

    /// Drop the entry document's own `<title>` so the beat title is the one
    /// browsers show.
    pub replace_title: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            site_host: DEFAULT_SITE_HOST.to_string(),
            default_image_url: DEFAULT_IMAGE_URL.to_string(),
            include_url_on_not_found: false,
            replace_title: false,
        }
    }
}

/// Record store selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Cloud Firestore over REST.
    Firestore(FirestoreConfig),
    /// JSON fixture file loaded into memory.
    Fixtures(PathBuf),
}

/// Firestore connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    /// GCP project ID.
    pub project_id: String,

    /// Firestore database ID.
    pub database: String,

    /// Collection holding beats.
    pub collection: String,

    /// `host:port` of a Firestore emulator; disables auth when set.
    pub emulator_host: Option<String>,

    /// Static OAuth access token. Without it, tokens come from the metadata server.
    pub access_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `FIRESTORE_PROJECT_ID`, unless `PREVIEW_FIXTURES` is set
    ///
    /// Optional:
    /// - `PREVIEW_BIND_ADDR`: Server bind address (default: "0.0.0.0:$PORT", PORT defaulting to 8080)
    /// - `PREVIEW_STATIC_DIR`: SPA build directory (default: "build")
    /// - `PREVIEW_INDEX_PATH`: Entry document (default: "$PREVIEW_STATIC_DIR/index.html")
    /// - `PREVIEW_RELOAD_INDEX`: Re-read the entry document per request (default: false)
    /// - `PREVIEW_SITE_NAME`: Site name (default: "UrBeatHub")
    /// - `PREVIEW_SITE_HOST`: Canonical host (default: "urbeathub.com")
    /// - `PREVIEW_DEFAULT_IMAGE_URL`: Fallback preview image
    /// - `PREVIEW_INCLUDE_URL_ON_NOT_FOUND`: og:url/og:type on not-found pages (default: false)
    /// - `PREVIEW_REPLACE_TITLE`: Remove the entry document's `<title>` on share pages (default: false)
    /// - `PREVIEW_FIXTURES`: JSON fixture file; replaces Firestore when set
    /// - `FIRESTORE_DATABASE`: Database ID (default: "(default)")
    /// - `FIRESTORE_COLLECTION`: Collection (default: "beats")
    /// - `FIRESTORE_EMULATOR_HOST`: Emulator `host:port`
    /// - `FIRESTORE_ACCESS_TOKEN`: Static bearer token
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = match non_empty_var("PREVIEW_BIND_ADDR") {
            Some(addr) => addr,
            None => {
                let port = non_empty_var("PORT").unwrap_or_else(|| "8080".to_string());
                let port: u16 = port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got '{port}'"))?;
                format!("0.0.0.0:{port}")
            }
        };

        let static_dir =
            PathBuf::from(non_empty_var("PREVIEW_STATIC_DIR").unwrap_or_else(|| "build".to_string()));

        let index_path = non_empty_var("PREVIEW_INDEX_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| static_dir.join("index.html"));

        let reload_index = bool_var("PREVIEW_RELOAD_INDEX")?;

        let site_host = non_empty_var("PREVIEW_SITE_HOST")
            .unwrap_or_else(|| DEFAULT_SITE_HOST.to_string())
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string();

        let default_image_url =
            non_empty_var("PREVIEW_DEFAULT_IMAGE_URL").unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());
        if !default_image_url.starts_with("https://") && !default_image_url.starts_with("http://") {
            anyhow::bail!("PREVIEW_DEFAULT_IMAGE_URL must be an absolute http(s) URL");
        }

        let site = SiteConfig {
            site_name: non_empty_var("PREVIEW_SITE_NAME")
                .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            site_host,
            default_image_url,
            include_url_on_not_found: bool_var("PREVIEW_INCLUDE_URL_ON_NOT_FOUND")?,
            replace_title: bool_var("PREVIEW_REPLACE_TITLE")?,
        };

        let store = match non_empty_var("PREVIEW_FIXTURES") {
            Some(path) => StoreConfig::Fixtures(PathBuf::from(path)),
            None => StoreConfig::Firestore(FirestoreConfig {
                project_id: non_empty_var("FIRESTORE_PROJECT_ID").ok_or_else(|| {
                    anyhow::anyhow!(
                        "FIRESTORE_PROJECT_ID environment variable is required (or set PREVIEW_FIXTURES)"
                    )
                })?,
                database: non_empty_var("FIRESTORE_DATABASE")
                    .unwrap_or_else(|| "(default)".to_string()),
                collection: non_empty_var("FIRESTORE_COLLECTION")
                    .unwrap_or_else(|| "beats".to_string()),
                emulator_host: non_empty_var("FIRESTORE_EMULATOR_HOST"),
                access_token: non_empty_var("FIRESTORE_ACCESS_TOKEN"),
            }),
        };

        tracing::info!(
            bind_addr = %bind_addr,
            static_dir = %static_dir.display(),
            index_path = %index_path.display(),
            reload_index,
            site_name = %site.site_name,
            site_host = %site.site_host,
            store = store.kind(),
            "preview configuration loaded"
        );

        Ok(Self {
            bind_addr,
            static_dir,
            index_path,
            reload_index,
            site,
            store,
        })
    }
}

impl StoreConfig {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Firestore(_) => "firestore",
            Self::Fixtures(_) => "fixtures",
        }
    }
}

/// Read an env var, treating empty or whitespace-only values as unset.
fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean flag; unset means `false`.
fn bool_var(key: &str) -> anyhow::Result<bool> {
    match non_empty_var(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        None => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => anyhow::bail!("{key} must be a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "PREVIEW_BIND_ADDR",
        "PORT",
        "PREVIEW_STATIC_DIR",
        "PREVIEW_INDEX_PATH",
        "PREVIEW_RELOAD_INDEX",
        "PREVIEW_SITE_NAME",
        "PREVIEW_SITE_HOST",
        "PREVIEW_DEFAULT_IMAGE_URL",
        "PREVIEW_INCLUDE_URL_ON_NOT_FOUND",
        "PREVIEW_REPLACE_TITLE",
        "PREVIEW_FIXTURES",
        "FIRESTORE_PROJECT_ID",
        "FIRESTORE_DATABASE",
        "FIRESTORE_COLLECTION",
        "FIRESTORE_EMULATOR_HOST",
        "FIRESTORE_ACCESS_TOKEN",
    ];

    /// Helper to run config tests with isolated env vars.
    /// Uses a mutex to prevent concurrent env var races.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[("FIRESTORE_PROJECT_ID", "urbeathub")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:8080");
            assert_eq!(config.static_dir, PathBuf::from("build"));
            assert_eq!(config.index_path, PathBuf::from("build").join("index.html"));
            assert!(!config.reload_index);
            assert_eq!(config.site, SiteConfig::default());
            assert_eq!(
                config.store,
                StoreConfig::Firestore(FirestoreConfig {
                    project_id: "urbeathub".to_string(),
                    database: "(default)".to_string(),
                    collection: "beats".to_string(),
                    emulator_host: None,
                    access_token: None,
                })
            );
        });
    }

    #[test]
    fn config_requires_project_without_fixtures() {
        with_env_vars(&[], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("FIRESTORE_PROJECT_ID"));
        });
    }

    #[test]
    fn config_fixtures_replace_firestore() {
        with_env_vars(&[("PREVIEW_FIXTURES", "fixtures/beats.json")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(
                config.store,
                StoreConfig::Fixtures(PathBuf::from("fixtures/beats.json"))
            );
            assert_eq!(config.store.kind(), "fixtures");
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("PREVIEW_BIND_ADDR", "127.0.0.1:9090"),
                ("PREVIEW_STATIC_DIR", "/srv/app"),
                ("PREVIEW_RELOAD_INDEX", "true"),
                ("PREVIEW_SITE_NAME", "Beat Shop"),
                ("PREVIEW_SITE_HOST", "beats.example"),
                ("PREVIEW_DEFAULT_IMAGE_URL", "https://beats.example/og.png"),
                ("PREVIEW_INCLUDE_URL_ON_NOT_FOUND", "yes"),
                ("PREVIEW_REPLACE_TITLE", "on"),
                ("FIRESTORE_PROJECT_ID", "proj"),
                ("FIRESTORE_DATABASE", "prod"),
                ("FIRESTORE_COLLECTION", "tracks"),
                ("FIRESTORE_EMULATOR_HOST", "localhost:8081"),
                ("FIRESTORE_ACCESS_TOKEN", "tok"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:9090");
                assert_eq!(config.static_dir, PathBuf::from("/srv/app"));
                assert_eq!(config.index_path, PathBuf::from("/srv/app/index.html"));
                assert!(config.reload_index);
                assert_eq!(config.site.site_name, "Beat Shop");
                assert_eq!(config.site.site_host, "beats.example");
                assert_eq!(config.site.default_image_url, "https://beats.example/og.png");
                assert!(config.site.include_url_on_not_found);
                assert!(config.site.replace_title);
                match config.store {
                    StoreConfig::Firestore(fs) => {
                        assert_eq!(fs.project_id, "proj");
                        assert_eq!(fs.database, "prod");
                        assert_eq!(fs.collection, "tracks");
                        assert_eq!(fs.emulator_host.as_deref(), Some("localhost:8081"));
                        assert_eq!(fs.access_token.as_deref(), Some("tok"));
                    }
                    other => panic!("expected firestore, got {other:?}"),
                }
            },
        );
    }

    #[test]
    fn config_port_fallback() {
        with_env_vars(&[("PORT", "3000"), ("PREVIEW_FIXTURES", "f.json")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:3000");
        });
    }

    #[test]
    fn config_invalid_port_rejected() {
        with_env_vars(&[("PORT", "eighty"), ("PREVIEW_FIXTURES", "f.json")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_explicit_index_path() {
        with_env_vars(
            &[
                ("PREVIEW_INDEX_PATH", "/tmp/shell.html"),
                ("PREVIEW_FIXTURES", "f.json"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.index_path, PathBuf::from("/tmp/shell.html"));
            },
        );
    }

    #[test]
    fn config_site_host_scheme_and_slash_stripped() {
        with_env_vars(
            &[
                ("PREVIEW_SITE_HOST", "https://urbeathub.com/"),
                ("PREVIEW_FIXTURES", "f.json"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.site.site_host, "urbeathub.com");
            },
        );
    }

    #[test]
    fn config_relative_default_image_rejected() {
        with_env_vars(
            &[
                ("PREVIEW_DEFAULT_IMAGE_URL", "/default_og.png"),
                ("PREVIEW_FIXTURES", "f.json"),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }

    #[test]
    fn config_invalid_bool_rejected() {
        with_env_vars(
            &[
                ("PREVIEW_RELOAD_INDEX", "maybe"),
                ("PREVIEW_FIXTURES", "f.json"),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("PREVIEW_RELOAD_INDEX"));
            },
        );
    }

    #[test]
    fn config_empty_values_treated_as_unset() {
        with_env_vars(
            &[
                ("PREVIEW_SITE_NAME", "  "),
                ("FIRESTORE_EMULATOR_HOST", ""),
                ("FIRESTORE_PROJECT_ID", "p"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.site.site_name, DEFAULT_SITE_NAME);
                match config.store {
                    StoreConfig::Firestore(fs) => assert!(fs.emulator_host.is_none()),
                    other => panic!("expected firestore, got {other:?}"),
                }
            },
        );
    }
}
