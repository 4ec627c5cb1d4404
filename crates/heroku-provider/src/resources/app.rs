//! The `app` resource

use async_trait::async_trait;
use heroku_api::Heroku;
use heroku_api::apps::{App, AppCreatePayload, AppUpdatePayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::handler::{ResourceHandler, ResourceRecord, decode_config, ignore_missing, optional};

const TYPE: &str = "app";

/// Desired state.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AppConfig {
    name: String,
    /// Create-only; a change means replacement.
    region: Option<String>,
    stack: Option<String>,
}

/// Tracked attributes. `web_url` and `git_url` only ever come from the
/// platform.
#[derive(Debug, Serialize, Deserialize)]
struct AppAttributes {
    name: String,
    region: String,
    stack: String,
    web_url: Option<String>,
    git_url: Option<String>,
}

fn record(app: &App) -> Result<ResourceRecord> {
    ResourceRecord::new(
        app.id.clone(),
        &AppAttributes {
            name: app.name.clone(),
            region: app.region.name.clone(),
            stack: app.stack.name.clone(),
            web_url: app.web_url.clone(),
            git_url: app.git_url.clone(),
        },
    )
}

pub struct AppHandler;

#[async_trait]
impl ResourceHandler for AppHandler {
    fn type_name(&self) -> &'static str {
        TYPE
    }

    async fn create(&self, api: &Heroku, desired: &Value) -> Result<ResourceRecord> {
        let config: AppConfig = decode_config(TYPE, desired)?;
        let payload = AppCreatePayload {
            name: Some(config.name.clone()),
            region: config.region.clone(),
            stack: config.stack.clone(),
        };
        let created = api
            .app_create(&payload)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(app = %created.name, id = %created.id, "created app");

        // Re-read so computed attributes reflect the platform's view.
        let app = api
            .app_info(&created.id)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        record(&app)
    }

    async fn read(&self, api: &Heroku, rec: &ResourceRecord) -> Result<Option<ResourceRecord>> {
        match optional(TYPE, api.app_info(&rec.id).await)? {
            Some(app) => Ok(Some(record(&app)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        api: &Heroku,
        rec: &ResourceRecord,
        desired: &Value,
    ) -> Result<ResourceRecord> {
        let config: AppConfig = decode_config(TYPE, desired)?;
        let current: AppAttributes = rec.attributes_as()?;

        if let Some(region) = &config.region {
            if *region != current.region {
                return Err(ProviderError::immutable(TYPE, "region"));
            }
        }

        let payload = AppUpdatePayload {
            name: (config.name != current.name).then(|| config.name.clone()),
            build_stack: config
                .stack
                .as_ref()
                .filter(|stack| **stack != current.stack)
                .cloned(),
        };
        if payload.name.is_none() && payload.build_stack.is_none() {
            return Ok(rec.clone());
        }

        let app = api
            .app_update(&rec.id, &payload)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(app = %app.name, id = %app.id, "updated app");
        record(&app)
    }

    async fn delete(&self, api: &Heroku, rec: &ResourceRecord) -> Result<()> {
        ignore_missing(TYPE, api.app_delete(&rec.id).await)?;
        tracing::info!(id = %rec.id, "deleted app");
        Ok(())
    }
}
