//! Provider configuration
//!
//! Explicit fields win; each unset field falls back to its environment
//! variable, matching the Heroku toolchain conventions. Credential
//! resolution itself (netrc precedence) happens in `heroku_api`.

use std::collections::HashMap;

use heroku_api::{ClientOptions, Credentials, credentials};

use crate::error::{ProviderError, Result};

pub const ENV_EMAIL: &str = "HEROKU_EMAIL";
pub const ENV_API_KEY: &str = "HEROKU_API_KEY";
pub const ENV_HEADERS: &str = "HEROKU_HEADERS";
pub const ENV_API_URL: &str = "HEROKU_API_URL";

/// Provider-level configuration.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub email: Option<String>,
    pub api_key: Option<String>,
    /// JSON object of extra headers, e.g. `{"X-Custom": "1"}`.
    pub headers: Option<String>,
    pub api_url: Option<String>,
    /// Log method, path and status of every API request.
    pub log_requests: bool,
}

impl ProviderConfig {
    /// Build a config entirely from the environment.
    pub fn from_env() -> Self {
        Self {
            email: env_var(ENV_EMAIL),
            api_key: env_var(ENV_API_KEY),
            headers: env_var(ENV_HEADERS),
            api_url: env_var(ENV_API_URL),
            log_requests: false,
        }
    }

    /// Resolve into credentials and client options.
    ///
    /// Fails with [`ProviderError::InvalidConfig`] on a malformed header
    /// map, a malformed API URL, or when no API key can be found anywhere.
    pub(crate) fn resolve(self) -> Result<(Credentials, ClientOptions)> {
        let env = Self::from_env();
        let email = self.email.or(env.email);
        let api_key = self.api_key.or(env.api_key);
        let headers = parse_headers(self.headers.or(env.headers))?;
        let base_url = self
            .api_url
            .or(env.api_url)
            .unwrap_or_else(|| heroku_api::DEFAULT_API_URL.to_string());

        let options = ClientOptions {
            base_url,
            log_requests: self.log_requests,
        };
        let host = options
            .host()
            .map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;
        let credentials = credentials::resolve(email, api_key, headers, &host)
            .map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;
        Ok((credentials, options))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_headers(raw: Option<String>) -> Result<HashMap<String, String>> {
    match raw {
        None => Ok(HashMap::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            ProviderError::InvalidConfig(format!(
                "{ENV_HEADERS} must be a JSON object of strings: {e}"
            ))
        }),
    }
}
