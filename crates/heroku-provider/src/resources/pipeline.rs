//! The `pipeline` resource

use async_trait::async_trait;
use heroku_api::Heroku;
use heroku_api::pipelines::Pipeline;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::handler::{ResourceHandler, ResourceRecord, decode_config, ignore_missing, optional};

const TYPE: &str = "pipeline";

/// Desired state.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PipelineConfig {
    name: String,
}

/// Tracked attributes.
#[derive(Debug, Serialize, Deserialize)]
struct PipelineAttributes {
    name: String,
}

fn record(pipeline: &Pipeline) -> Result<ResourceRecord> {
    ResourceRecord::new(
        pipeline.id.clone(),
        &PipelineAttributes {
            name: pipeline.name.clone(),
        },
    )
}

pub struct PipelineHandler;

#[async_trait]
impl ResourceHandler for PipelineHandler {
    fn type_name(&self) -> &'static str {
        TYPE
    }

    async fn create(&self, api: &Heroku, desired: &Value) -> Result<ResourceRecord> {
        let config: PipelineConfig = decode_config(TYPE, desired)?;
        let created = api
            .pipeline_create(&config.name)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(pipeline = %created.name, id = %created.id, "created pipeline");

        let pipeline = api
            .pipeline_info(&created.id)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        record(&pipeline)
    }

    async fn read(&self, api: &Heroku, rec: &ResourceRecord) -> Result<Option<ResourceRecord>> {
        match optional(TYPE, api.pipeline_info(&rec.id).await)? {
            Some(pipeline) => Ok(Some(record(&pipeline)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        api: &Heroku,
        rec: &ResourceRecord,
        desired: &Value,
    ) -> Result<ResourceRecord> {
        let config: PipelineConfig = decode_config(TYPE, desired)?;
        let current: PipelineAttributes = rec.attributes_as()?;
        if config.name == current.name {
            return Ok(rec.clone());
        }

        let pipeline = api
            .pipeline_update(&rec.id, &config.name)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(pipeline = %pipeline.name, "renamed pipeline");
        record(&pipeline)
    }

    async fn delete(&self, api: &Heroku, rec: &ResourceRecord) -> Result<()> {
        ignore_missing(TYPE, api.pipeline_delete(&rec.id).await)?;
        tracing::info!(id = %rec.id, "deleted pipeline");
        Ok(())
    }
}
