// Connection settings for the platform API.
// Resolved once at startup (flags first, then environment, then defaults)
// and handed to `ApiClient::new`. The struct is immutable afterwards.

use crate::error::{ApiError, Result};

pub const API_URL_ENV: &str = "VOYNICH_API_URL";
pub const API_KEY_ENV: &str = "VOYNICH_API_KEY";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
    api_key: String,
}

impl Config {
    /// Validate the resolved values. Trailing slashes are stripped from the
    /// base URL; a missing or blank API key is a configuration error.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ApiError::Config(format!(
                    "API key is required. Provide it with --api-key or set the {} environment variable.",
                    API_KEY_ENV
                ))
            })?;

        let base_url: String = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::Config("base URL must not be empty".into()));
        }

        Ok(Config { base_url, api_key })
    }

    /// Build a config from `VOYNICH_API_URL` / `VOYNICH_API_KEY`, falling
    /// back to `http://localhost:3000` for the URL.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Config::new(base_url, std::env::var(API_KEY_ENV).ok())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

// Keep the key out of debug output and logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
