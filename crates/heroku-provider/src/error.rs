//! Provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Malformed provider configuration or desired state. Fatal; raised
    /// before any API call.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Tracked record attributes that no longer decode.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The platform rejected or failed an API call.
    #[error("{resource}: {source}")]
    Api {
        resource: &'static str,
        #[source]
        source: heroku_api::Error,
    },

    /// A desired change to a field the platform cannot change after
    /// creation. The orchestrator plans a replacement instead.
    #[error("{resource}.{field} cannot be changed after creation")]
    Immutable {
        resource: &'static str,
        field: &'static str,
    },

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
}

impl ProviderError {
    pub fn api(resource: &'static str, source: heroku_api::Error) -> Self {
        Self::Api { resource, source }
    }

    pub fn immutable(resource: &'static str, field: &'static str) -> Self {
        Self::Immutable { resource, field }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
