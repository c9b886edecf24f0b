//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `TELSHOP_API_BASE` - Backend REST base URL (default: `http://localhost:8080/telshop`)
//! - `TELSHOP_CART_PATH` - File holding the saved cart (default: `phoneShopCart.json`)
//! - `TELSHOP_CLIENT_ID` - Client ID sent with add-to-cart calls (default: 1)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use telshop_core::ClientId;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE: &str = "http://localhost:8080/telshop";
const DEFAULT_CART_PATH: &str = "phoneShopCart.json";
const DEFAULT_CLIENT_ID: &str = "1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Backend REST base URL, without a trailing slash
    pub api_base: Url,
    /// Where the cart mirror is stored
    pub cart_path: PathBuf,
    /// Client ID for best-effort server-side cart calls
    pub client_id: ClientId,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = parse_api_base(
            "TELSHOP_API_BASE",
            &get_env_or_default(&lookup, "TELSHOP_API_BASE", DEFAULT_API_BASE),
        )?;
        let cart_path = PathBuf::from(get_env_or_default(
            &lookup,
            "TELSHOP_CART_PATH",
            DEFAULT_CART_PATH,
        ));
        let client_id = get_env_or_default(&lookup, "TELSHOP_CLIENT_ID", DEFAULT_CLIENT_ID)
            .parse::<ClientId>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TELSHOP_CLIENT_ID".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base,
            cart_path,
            client_id,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Replace the backend URL, e.g. from a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse.
    pub fn with_api_base(mut self, api_base: &str) -> Result<Self, ConfigError> {
        self.api_base = parse_api_base("--api-base", api_base)?;
        Ok(self)
    }

    /// Replace the cart mirror location.
    #[must_use]
    pub fn with_cart_path(mut self, cart_path: impl Into<PathBuf>) -> Self {
        self.cart_path = cart_path.into();
        self
    }

    /// Absolute URL of a backend-relative image path.
    ///
    /// Images are served from the backend host root, not from under the API
    /// base path.
    #[must_use]
    pub fn image_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let origin = self.api_base.origin().ascii_serialization();
        if path.starts_with('/') {
            format!("{origin}{path}")
        } else {
            format!("{origin}/{path}")
        }
    }
}

fn parse_api_base(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            format!("unsupported scheme: {}", url.scheme()),
        ));
    }
    Ok(url)
}

fn get_optional_env<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|s| !s.is_empty())
}

fn get_env_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}
