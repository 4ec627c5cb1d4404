//! The `pipeline_coupling` resource

use async_trait::async_trait;
use heroku_api::Heroku;
use heroku_api::pipelines::{CouplingCreatePayload, PipelineCoupling};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::handler::{ResourceHandler, ResourceRecord, decode_config, ignore_missing, optional};

const TYPE: &str = "pipeline_coupling";

/// Desired state.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CouplingConfig {
    /// App name or UUID; create-only.
    app: String,
    /// Pipeline UUID; create-only.
    pipeline: String,
    stage: String,
}

/// Tracked attributes. `app` and `pipeline` are echoed as given; the IDs
/// come from the platform.
#[derive(Debug, Serialize, Deserialize)]
struct CouplingAttributes {
    app: String,
    pipeline: String,
    app_id: String,
    pipeline_id: String,
    stage: String,
}

fn record(coupling: &PipelineCoupling, app: String, pipeline: String) -> Result<ResourceRecord> {
    ResourceRecord::new(
        coupling.id.clone(),
        &CouplingAttributes {
            app,
            pipeline,
            app_id: coupling.app.id.clone(),
            pipeline_id: coupling.pipeline.id.clone(),
            stage: coupling.stage.clone(),
        },
    )
}

pub struct PipelineCouplingHandler;

#[async_trait]
impl ResourceHandler for PipelineCouplingHandler {
    fn type_name(&self) -> &'static str {
        TYPE
    }

    async fn create(&self, api: &Heroku, desired: &Value) -> Result<ResourceRecord> {
        let config: CouplingConfig = decode_config(TYPE, desired)?;
        let payload = CouplingCreatePayload {
            app: config.app.clone(),
            pipeline: config.pipeline.clone(),
            stage: config.stage.clone(),
        };
        let created = api
            .coupling_create(&payload)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(app = %config.app, stage = %created.stage, "coupled app to pipeline");

        let coupling = api
            .coupling_info(&created.id)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        record(&coupling, config.app, config.pipeline)
    }

    async fn read(&self, api: &Heroku, rec: &ResourceRecord) -> Result<Option<ResourceRecord>> {
        let current: CouplingAttributes = rec.attributes_as()?;
        match optional(TYPE, api.coupling_info(&rec.id).await)? {
            Some(coupling) => Ok(Some(record(&coupling, current.app, current.pipeline)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        api: &Heroku,
        rec: &ResourceRecord,
        desired: &Value,
    ) -> Result<ResourceRecord> {
        let config: CouplingConfig = decode_config(TYPE, desired)?;
        let current: CouplingAttributes = rec.attributes_as()?;

        if config.app != current.app {
            return Err(ProviderError::immutable(TYPE, "app"));
        }
        if config.pipeline != current.pipeline {
            return Err(ProviderError::immutable(TYPE, "pipeline"));
        }
        if config.stage == current.stage {
            return Ok(rec.clone());
        }

        let coupling = api
            .coupling_update(&rec.id, &config.stage)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(app = %current.app, stage = %coupling.stage, "moved app to another stage");
        record(&coupling, current.app, current.pipeline)
    }

    async fn delete(&self, api: &Heroku, rec: &ResourceRecord) -> Result<()> {
        ignore_missing(TYPE, api.coupling_delete(&rec.id).await)?;
        tracing::info!(id = %rec.id, "removed pipeline coupling");
        Ok(())
    }
}
