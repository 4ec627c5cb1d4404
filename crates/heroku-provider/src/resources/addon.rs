//! The `addon` resource

use std::collections::HashMap;

use async_trait::async_trait;
use heroku_api::Heroku;
use heroku_api::addons::{Addon, AddonCreatePayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::handler::{ResourceHandler, ResourceRecord, decode_config, ignore_missing, optional};

const TYPE: &str = "addon";

/// Desired state.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AddonConfig {
    /// App name or UUID; create-only.
    app: String,
    plan: String,
    /// Provider-specific provisioning options; create-only and never
    /// reported back by the platform.
    config: Option<HashMap<String, String>>,
}

/// Tracked attributes. `name` and `config_vars` are assigned by the
/// platform; `app` and `config` are echoed from the desired state.
#[derive(Debug, Serialize, Deserialize)]
struct AddonAttributes {
    app: String,
    app_id: String,
    plan: String,
    name: String,
    config_vars: Vec<String>,
    config: Option<HashMap<String, String>>,
}

fn record(
    addon: &Addon,
    app: String,
    config: Option<HashMap<String, String>>,
) -> Result<ResourceRecord> {
    ResourceRecord::new(
        addon.id.clone(),
        &AddonAttributes {
            app,
            app_id: addon.app.id.clone(),
            plan: addon.plan.name.clone(),
            name: addon.name.clone(),
            config_vars: addon.config_vars.clone(),
            config,
        },
    )
}

pub struct AddonHandler;

#[async_trait]
impl ResourceHandler for AddonHandler {
    fn type_name(&self) -> &'static str {
        TYPE
    }

    async fn create(&self, api: &Heroku, desired: &Value) -> Result<ResourceRecord> {
        let config: AddonConfig = decode_config(TYPE, desired)?;
        let payload = AddonCreatePayload {
            plan: config.plan.clone(),
            config: config.config.clone(),
        };
        let created = api
            .addon_create(&config.app, &payload)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(addon = %created.name, plan = %created.plan.name, "provisioned add-on");

        let addon = api
            .addon_info(&created.id)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        record(&addon, config.app, config.config)
    }

    async fn read(&self, api: &Heroku, rec: &ResourceRecord) -> Result<Option<ResourceRecord>> {
        let current: AddonAttributes = rec.attributes_as()?;
        match optional(TYPE, api.addon_info(&rec.id).await)? {
            Some(addon) => Ok(Some(record(&addon, current.app, current.config)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        api: &Heroku,
        rec: &ResourceRecord,
        desired: &Value,
    ) -> Result<ResourceRecord> {
        let config: AddonConfig = decode_config(TYPE, desired)?;
        let current: AddonAttributes = rec.attributes_as()?;

        if config.app != current.app {
            return Err(ProviderError::immutable(TYPE, "app"));
        }
        if config.config.clone().unwrap_or_default() != current.config.clone().unwrap_or_default()
        {
            return Err(ProviderError::immutable(TYPE, "config"));
        }
        if config.plan == current.plan {
            return Ok(rec.clone());
        }

        let addon = api
            .addon_update(&current.app_id, &rec.id, &config.plan)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(addon = %addon.name, plan = %addon.plan.name, "changed add-on plan");
        record(&addon, current.app, current.config)
    }

    async fn delete(&self, api: &Heroku, rec: &ResourceRecord) -> Result<()> {
        let current: AddonAttributes = rec.attributes_as()?;
        ignore_missing(TYPE, api.addon_delete(&current.app_id, &rec.id).await)?;
        tracing::info!(addon = %current.name, "deprovisioned add-on");
        Ok(())
    }
}
