//! Credential resolution
//!
//! Explicit configuration is the baseline; a netrc entry for the API host
//! takes precedence when it carries both a login and a password, matching
//! the Heroku CLI's behavior.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::netrc;

/// Resolved credentials for the Heroku Platform API.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Account email; may be empty when authenticating by API key alone.
    pub email: String,
    pub api_key: String,
    /// Extra headers attached to every request.
    pub headers: HashMap<String, String>,
}

/// Resolve credentials from explicit values and the netrc file.
///
/// A netrc entry for `api_host` with both a login and a password overrides
/// the explicit values. An unreadable or malformed netrc logs a warning and
/// is otherwise ignored. Resolution fails only when no API key is found at
/// all.
pub fn resolve(
    email: Option<String>,
    api_key: Option<String>,
    headers: HashMap<String, String>,
    api_host: &str,
) -> Result<Credentials> {
    let mut email = email;
    let mut api_key = api_key;

    match netrc::lookup(api_host) {
        Ok(Some(machine)) if machine.login.is_some() && machine.password.is_some() => {
            tracing::debug!(host = %api_host, "using netrc credentials");
            email = machine.login;
            api_key = machine.password;
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unusable netrc file");
        }
    }

    let api_key = api_key
        .filter(|key| !key.is_empty())
        .ok_or(Error::MissingCredentials)?;

    Ok(Credentials {
        email: email.unwrap_or_default(),
        api_key,
        headers,
    })
}
