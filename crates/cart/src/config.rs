//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `KOPERNIK_BASE_URL` - Storefront URL orders are posted under (default: `http://127.0.0.1:5000/`)
//! - `KOPERNIK_STORAGE_PATH` - File backing the client-local store (default: `.kopernik/storage.json`)
//! - `KOPERNIK_CATALOG_PATH` - Host catalog JSON file; without it every item is unresolved
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
const DEFAULT_STORAGE_PATH: &str = ".kopernik/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Storefront base URL, always ending in `/`
    pub base_url: Url,
    /// File backing the client-local key/value store
    pub storage_path: PathBuf,
    /// Host catalog JSON file
    pub catalog_path: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_base_url =
            get_optional("KOPERNIK_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("KOPERNIK_BASE_URL".to_string(), e)
        })?;

        let storage_path = get_optional("KOPERNIK_STORAGE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);

        Ok(Self {
            base_url,
            storage_path,
            catalog_path: get_optional("KOPERNIK_CATALOG_PATH").map(PathBuf::from),
            sentry_dsn: get_optional("SENTRY_DSN"),
        })
    }

    /// The order endpoint, `<base_url>/orders`.
    #[must_use]
    pub fn orders_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("orders");
        }
        url
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an http(s) base URL, normalizing it to end with `/`.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.storage_path, PathBuf::from(".kopernik/storage.json"));
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.sentry_dsn, None);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("KOPERNIK_STORAGE_PATH", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.storage_path, PathBuf::from(".kopernik/storage.json"));
        assert_eq!(config.sentry_dsn, None);
    }

    #[test]
    fn test_orders_url() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.orders_url().as_str(), "http://127.0.0.1:5000/orders");

        let config = config_from(&[("KOPERNIK_BASE_URL", "https://shop.example/pizza")]).unwrap();
        assert_eq!(config.base_url.as_str(), "https://shop.example/pizza/");
        assert_eq!(
            config.orders_url().as_str(),
            "https://shop.example/pizza/orders"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = config_from(&[("KOPERNIK_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "KOPERNIK_BASE_URL"));

        let err = config_from(&[("KOPERNIK_BASE_URL", "ftp://shop.example")]).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_optional_paths() {
        let config = config_from(&[
            ("KOPERNIK_STORAGE_PATH", "/tmp/kopernik.json"),
            ("KOPERNIK_CATALOG_PATH", "menu.json"),
        ])
        .unwrap();
        assert_eq!(config.storage_path, PathBuf::from("/tmp/kopernik.json"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("menu.json")));
    }
}
