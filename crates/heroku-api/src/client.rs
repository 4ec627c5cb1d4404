//! Heroku Platform API client
//!
//! Thin typed wrapper over the Platform API v3. Construction, authentication
//! and response decoding live here; the per-resource endpoint methods live in
//! the resource modules.

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.heroku.com";

/// Version selector the Platform API requires on every request.
pub const ACCEPT_HEADER: &str = "application/vnd.heroku+json; version=3";

const USER_AGENT: &str = concat!("heroku-provider/", env!("CARGO_PKG_VERSION"));

/// Client construction options.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the Platform API.
    pub base_url: String,
    /// Log method, path and status of every request.
    pub log_requests: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            log_requests: false,
        }
    }
}

impl ClientOptions {
    /// Hostname of the configured base URL, used for netrc matching.
    pub fn host(&self) -> Result<String> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidBaseUrl(self.base_url.clone()))
    }
}

/// Heroku Platform API client
#[derive(Clone)]
pub struct Heroku {
    client: reqwest::Client,
    base_url: String,
    email: String,
    api_key: String,
    log_requests: bool,
}

impl std::fmt::Debug for Heroku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heroku")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Heroku {
    /// Create a client against the default endpoint.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_options(credentials, ClientOptions::default())
    }

    /// Create a client with explicit options.
    pub fn with_options(credentials: Credentials, options: ClientOptions) -> Result<Self> {
        Url::parse(&options.base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{}: {e}", options.base_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        for (name, value) in &credentials.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidHeader(format!("value for {name}")))?;
            headers.insert(header_name, header_value);
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            email: credentials.email,
            api_key: credentials.api_key,
            log_requests: options.log_requests,
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .basic_auth(&self.email, Some(&self.api_key))
            .send()
            .await?;
        self.decode("GET", path, response).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .basic_auth(&self.email, Some(&self.api_key))
            .json(body)
            .send()
            .await?;
        self.decode("POST", path, response).await
    }

    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let response = self
            .client
            .patch(format!("{}{}", self.base_url, path))
            .basic_auth(&self.email, Some(&self.api_key))
            .json(body)
            .send()
            .await?;
        self.decode("PATCH", path, response).await
    }

    /// Issue a DELETE and discard the response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}{}", self.base_url, path))
            .basic_auth(&self.email, Some(&self.api_key))
            .send()
            .await?;

        let status = response.status();
        if self.log_requests {
            tracing::debug!(method = "DELETE", path, status = %status, "heroku api response");
        }
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await?;
        Err(parse_api_error(status, &body))
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if self.log_requests {
            tracing::debug!(method, path, status = %status, "heroku api response");
        }
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(parse_api_error(status, &body));
        }
        Ok(response.json().await?)
    }
}

/// Decode a Platform API error body into [`Error::Api`].
///
/// Error bodies are JSON of the form `{"id": "...", "message": "..."}`;
/// anything else maps to id `unknown` with the raw body as the message.
fn parse_api_error(status: StatusCode, body: &[u8]) -> Error {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        id: Option<String>,
        message: Option<String>,
    }

    let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();
    let (id, message) = match parsed {
        Some(ErrorBody {
            id: Some(id),
            message,
        }) => (id, message),
        _ => (String::from("unknown"), None),
    };

    Error::Api {
        status,
        id,
        message: message.unwrap_or_else(|| String::from_utf8_lossy(body).into_owned()),
    }
}
