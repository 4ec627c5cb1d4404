//! Heroku API error types

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while configuring or talking to the Heroku Platform API.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid extra header: {0}")]
    InvalidHeader(String),

    #[error("no API key: set api_key explicitly or add a netrc entry for the API host")]
    MissingCredentials,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("heroku api error ({status}, {id}): {message}")]
    Api {
        status: StatusCode,
        /// Heroku's machine-readable error id, `"unknown"` when the body
        /// could not be parsed.
        id: String,
        message: String,
    },
}

impl Error {
    /// True when the API reported that the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
