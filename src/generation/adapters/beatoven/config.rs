//! Environment-sourced provider configuration.

use std::env;

/// Public endpoint used when no override is configured.
pub const DEFAULT_API_URL: &str = "https://public-api.beatoven.ai/api/v1";

const API_URL_VAR: &str = "BEATOVEN_API_URL";
const API_KEY_VAR: &str = "BEATOVEN_API_KEY";

/// Provider endpoint and credentials.
///
/// A missing API key is not an error here: the client then sends
/// unauthenticated requests and every compose call fails with the
/// provider's 401-class rejection instead of crashing the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    base_url: String,
    api_key: Option<String>,
}

impl ProviderConfig {
    /// Creates a configuration with an explicit endpoint and optional key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let raw: String = base_url.into();
        Self {
            base_url: raw.trim_end_matches('/').to_owned(),
            api_key,
        }
    }

    /// Reads the configuration from `BEATOVEN_API_URL` and
    /// `BEATOVEN_API_KEY`, falling back to the public endpoint.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var(API_URL_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Self::new(base_url, api_key)
    }

    /// Returns the endpoint base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the bearer token, when configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}
