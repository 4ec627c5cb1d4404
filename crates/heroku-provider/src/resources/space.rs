//! The `space` resource
//!
//! Space allocation is asynchronous on the platform's side: the `state`
//! attribute starts at `allocating` and flips to `allocated` later. The
//! handler reports the state as returned and never waits for allocation.

use async_trait::async_trait;
use heroku_api::Heroku;
use heroku_api::spaces::{Space, SpaceCreatePayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::handler::{ResourceHandler, ResourceRecord, decode_config, ignore_missing, optional};

const TYPE: &str = "space";

/// Desired state.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpaceConfig {
    name: String,
    /// Owning team; create-only.
    team: String,
    /// Create-only; the platform picks a default when omitted.
    region: Option<String>,
}

/// Tracked attributes. `team` is echoed as given; `region` and `state`
/// come from the platform.
#[derive(Debug, Serialize, Deserialize)]
struct SpaceAttributes {
    name: String,
    team: String,
    region: String,
    state: String,
}

fn record(space: &Space, team: String) -> Result<ResourceRecord> {
    ResourceRecord::new(
        space.id.clone(),
        &SpaceAttributes {
            name: space.name.clone(),
            team,
            region: space.region.name.clone(),
            state: space.state.clone(),
        },
    )
}

pub struct SpaceHandler;

#[async_trait]
impl ResourceHandler for SpaceHandler {
    fn type_name(&self) -> &'static str {
        TYPE
    }

    async fn create(&self, api: &Heroku, desired: &Value) -> Result<ResourceRecord> {
        let config: SpaceConfig = decode_config(TYPE, desired)?;
        let payload = SpaceCreatePayload {
            name: config.name.clone(),
            team: config.team.clone(),
            region: config.region.clone(),
        };
        let created = api
            .space_create(&payload)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(space = %created.name, state = %created.state, "created space");

        let space = api
            .space_info(&created.id)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        record(&space, config.team)
    }

    async fn read(&self, api: &Heroku, rec: &ResourceRecord) -> Result<Option<ResourceRecord>> {
        let current: SpaceAttributes = rec.attributes_as()?;
        match optional(TYPE, api.space_info(&rec.id).await)? {
            Some(space) => Ok(Some(record(&space, current.team)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        api: &Heroku,
        rec: &ResourceRecord,
        desired: &Value,
    ) -> Result<ResourceRecord> {
        let config: SpaceConfig = decode_config(TYPE, desired)?;
        let current: SpaceAttributes = rec.attributes_as()?;

        if config.team != current.team {
            return Err(ProviderError::immutable(TYPE, "team"));
        }
        if let Some(region) = &config.region {
            if *region != current.region {
                return Err(ProviderError::immutable(TYPE, "region"));
            }
        }
        if config.name == current.name {
            return Ok(rec.clone());
        }

        let space = api
            .space_update(&rec.id, &config.name)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(space = %space.name, "renamed space");
        record(&space, current.team)
    }

    async fn delete(&self, api: &Heroku, rec: &ResourceRecord) -> Result<()> {
        ignore_missing(TYPE, api.space_delete(&rec.id).await)?;
        tracing::info!(id = %rec.id, "deleted space");
        Ok(())
    }
}
