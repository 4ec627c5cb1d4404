//! Heroku resource provider
//!
//! Declarative CRUD over the Heroku Platform API for an infrastructure
//! orchestrator: desired state comes in as JSON documents, tracked records
//! go out. The orchestrator owns planning and state storage; this crate
//! owns talking to Heroku.
//!
//! # Resource types
//!
//! `app`, `app_config_vars`, `addon`, `addon_attachment`, `pipeline`,
//! `pipeline_coupling`, `space`, `space_app_access`.
//!
//! # Example
//!
//! ```ignore
//! use heroku_provider::{HerokuProvider, ProviderConfig};
//! use serde_json::json;
//!
//! // Credentials come from explicit config, HEROKU_* env vars or netrc.
//! let provider = HerokuProvider::configure(ProviderConfig::from_env())?;
//!
//! let record = provider
//!     .create("app", &json!({"name": "example", "region": "eu"}))
//!     .await?;
//! println!("created {} ({})", record.attributes["name"], record.id);
//!
//! provider.delete("app", &record).await?;
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod id;
pub mod reconcile;
pub mod resources;

pub use config::ProviderConfig;
pub use error::{ProviderError, Result};
pub use handler::{ResourceHandler, ResourceRecord};

use std::collections::HashMap;

use heroku_api::Heroku;
use serde_json::Value;

/// A configured API client plus the registered resource handlers.
pub struct HerokuProvider {
    api: Heroku,
    handlers: HashMap<&'static str, Box<dyn ResourceHandler>>,
}

impl HerokuProvider {
    /// Resolve credentials, build the API client and register the built-in
    /// handlers.
    ///
    /// Every failure here is a configuration error; no API call is made.
    pub fn configure(config: ProviderConfig) -> Result<Self> {
        let (credentials, options) = config.resolve()?;
        tracing::info!(
            email = %credentials.email,
            base_url = %options.base_url,
            "configured heroku provider"
        );
        let api = Heroku::with_options(credentials, options)
            .map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;

        let mut handlers: HashMap<&'static str, Box<dyn ResourceHandler>> = HashMap::new();
        for handler in resources::built_in() {
            handlers.insert(handler.type_name(), handler);
        }
        Ok(Self { api, handlers })
    }

    /// Registered resource type names, sorted.
    pub fn resource_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn handler(&self, resource_type: &str) -> Result<&dyn ResourceHandler> {
        self.handlers
            .get(resource_type)
            .map(Box::as_ref)
            .ok_or_else(|| ProviderError::UnknownResourceType(resource_type.to_string()))
    }

    /// Create a resource from its desired state.
    pub async fn create(&self, resource_type: &str, desired: &Value) -> Result<ResourceRecord> {
        self.handler(resource_type)?.create(&self.api, desired).await
    }

    /// Refresh a tracked record. `Ok(None)` means the resource is gone
    /// remotely.
    pub async fn read(
        &self,
        resource_type: &str,
        record: &ResourceRecord,
    ) -> Result<Option<ResourceRecord>> {
        self.handler(resource_type)?.read(&self.api, record).await
    }

    /// Converge a resource toward a new desired state.
    pub async fn update(
        &self,
        resource_type: &str,
        record: &ResourceRecord,
        desired: &Value,
    ) -> Result<ResourceRecord> {
        self.handler(resource_type)?
            .update(&self.api, record, desired)
            .await
    }

    /// Delete a resource. An already absent resource is success.
    pub async fn delete(&self, resource_type: &str, record: &ResourceRecord) -> Result<()> {
        self.handler(resource_type)?.delete(&self.api, record).await
    }
}

impl std::fmt::Debug for HerokuProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HerokuProvider")
            .field("api", &self.api)
            .field("resource_types", &self.resource_types())
            .finish_non_exhaustive()
    }
}
