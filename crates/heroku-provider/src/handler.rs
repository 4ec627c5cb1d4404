//! Resource handler contract
//!
//! A handler owns the CRUD lifecycle of one resource type. Desired state
//! arrives as raw JSON from the orchestrator and is decoded exactly once
//! into the handler's typed config; unknown fields are rejected there.

use async_trait::async_trait;
use heroku_api::Heroku;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};

/// Tracked state of one managed resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Stable external identifier, fixed at creation.
    pub id: String,
    /// Last known attributes, refreshed on read.
    pub attributes: serde_json::Map<String, Value>,
}

impl ResourceRecord {
    /// Build a record from a serializable attribute struct.
    pub fn new(id: impl Into<String>, attributes: &impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(attributes)
            .map_err(|e| ProviderError::InvalidState(e.to_string()))?;
        let attributes = match value {
            Value::Object(map) => map,
            other => {
                return Err(ProviderError::InvalidState(format!(
                    "attributes must be a JSON object, got {other}"
                )));
            }
        };
        Ok(Self {
            id: id.into(),
            attributes,
        })
    }

    /// Decode the tracked attributes back into a typed view.
    pub fn attributes_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.attributes.clone()))
            .map_err(|e| ProviderError::InvalidState(e.to_string()))
    }
}

/// CRUD handler for one resource type.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Resource type name used for dispatch.
    fn type_name(&self) -> &'static str;

    /// Create the resource and return its initial record. Computed
    /// attributes come from a re-read of the platform's view, never from
    /// the desired state.
    async fn create(&self, api: &Heroku, desired: &Value) -> Result<ResourceRecord>;

    /// Refresh the record from the platform. `Ok(None)` means the resource
    /// no longer exists remotely; absence is not an error.
    async fn read(&self, api: &Heroku, record: &ResourceRecord) -> Result<Option<ResourceRecord>>;

    /// Converge the remote resource toward the desired state with the
    /// fewest calls. An unchanged desired state issues none; a change to a
    /// create-only field is [`ProviderError::Immutable`].
    async fn update(
        &self,
        api: &Heroku,
        record: &ResourceRecord,
        desired: &Value,
    ) -> Result<ResourceRecord>;

    /// Remove the resource. An already absent resource is success.
    async fn delete(&self, api: &Heroku, record: &ResourceRecord) -> Result<()>;
}

/// Decode a desired-state document into a typed config.
pub(crate) fn decode_config<T: DeserializeOwned>(
    resource: &'static str,
    desired: &Value,
) -> Result<T> {
    serde_json::from_value(desired.clone())
        .map_err(|e| ProviderError::InvalidConfig(format!("{resource}: {e}")))
}

/// Map a "not found" API error into absence.
pub(crate) fn optional<T>(
    resource: &'static str,
    result: heroku_api::Result<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(ProviderError::api(resource, e)),
    }
}

/// Treat an already absent resource as successfully deleted.
pub(crate) fn ignore_missing(resource: &'static str, result: heroku_api::Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(ProviderError::api(resource, e)),
    }
}
