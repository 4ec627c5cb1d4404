//! Pipeline and pipeline coupling endpoints
//!
//! A coupling places an app into a pipeline at a stage (`test`, `review`,
//! `development`, `staging`, `production`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Heroku;
use crate::error::Result;

/// A pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    pub id: String,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A coupling between an app and a pipeline stage.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineCoupling {
    pub id: String,
    pub app: IdRef,
    pub pipeline: IdRef,
    pub stage: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Bare reference to another resource.
#[derive(Debug, Clone, Deserialize)]
pub struct IdRef {
    pub id: String,
}

/// Fields accepted by coupling creation.
#[derive(Debug, Clone, Serialize)]
pub struct CouplingCreatePayload {
    pub app: String,
    pub pipeline: String,
    pub stage: String,
}

#[derive(Serialize)]
struct NamePayload<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct StagePayload<'a> {
    stage: &'a str,
}

impl Heroku {
    /// Create a pipeline.
    pub async fn pipeline_create(&self, name: &str) -> Result<Pipeline> {
        self.post("/pipelines", &NamePayload { name }).await
    }

    /// Fetch a pipeline by ID.
    pub async fn pipeline_info(&self, id: &str) -> Result<Pipeline> {
        self.get(&format!("/pipelines/{id}")).await
    }

    /// Rename a pipeline.
    pub async fn pipeline_update(&self, id: &str, name: &str) -> Result<Pipeline> {
        self.patch(&format!("/pipelines/{id}"), &NamePayload { name })
            .await
    }

    /// Delete a pipeline.
    pub async fn pipeline_delete(&self, id: &str) -> Result<()> {
        self.delete(&format!("/pipelines/{id}")).await
    }

    /// Add an app to a pipeline at a stage.
    pub async fn coupling_create(
        &self,
        payload: &CouplingCreatePayload,
    ) -> Result<PipelineCoupling> {
        self.post("/pipeline-couplings", payload).await
    }

    /// Fetch a coupling by ID.
    pub async fn coupling_info(&self, id: &str) -> Result<PipelineCoupling> {
        self.get(&format!("/pipeline-couplings/{id}")).await
    }

    /// Move a coupling to another stage.
    pub async fn coupling_update(&self, id: &str, stage: &str) -> Result<PipelineCoupling> {
        self.patch(&format!("/pipeline-couplings/{id}"), &StagePayload { stage })
            .await
    }

    /// Remove an app from its pipeline.
    pub async fn coupling_delete(&self, id: &str) -> Result<()> {
        self.delete(&format!("/pipeline-couplings/{id}")).await
    }
}
