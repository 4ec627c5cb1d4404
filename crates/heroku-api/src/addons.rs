//! Add-on and add-on attachment endpoints
//!
//! An add-on is provisioned under an owning app; an attachment shares an
//! existing add-on with another app.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Heroku;
use crate::error::Result;

/// A provisioned add-on.
#[derive(Debug, Clone, Deserialize)]
pub struct Addon {
    pub id: String,
    /// Platform-assigned instance name, e.g. `postgresql-cubed-12345`.
    pub name: String,
    pub app: AppRef,
    pub plan: Plan,
    /// Names of the config vars this add-on exposes on the owning app.
    #[serde(default)]
    pub config_vars: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub id: String,
    /// Fully qualified plan name, e.g. `heroku-postgresql:essential-0`.
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppRef {
    pub id: String,
    pub name: String,
}

/// An attachment of an add-on to an app.
#[derive(Debug, Clone, Deserialize)]
pub struct AddonAttachment {
    pub id: String,
    /// Attachment name; determines the config-var prefix on the attached app.
    pub name: Option<String>,
    pub addon: AttachedAddon,
    pub app: AppRef,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachedAddon {
    pub id: String,
    pub name: String,
    pub app: AppRef,
}

/// Fields accepted by add-on creation.
#[derive(Debug, Clone, Serialize)]
pub struct AddonCreatePayload {
    pub plan: String,
    /// Provider-specific provisioning options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<HashMap<String, String>>,
}

/// Fields accepted by attachment creation.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentCreatePayload {
    pub addon: String,
    pub app: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Serialize)]
struct AddonUpdatePayload<'a> {
    plan: &'a str,
}

impl Heroku {
    /// Provision an add-on on an app.
    pub async fn addon_create(&self, app: &str, payload: &AddonCreatePayload) -> Result<Addon> {
        self.post(&format!("/apps/{app}/addons"), payload).await
    }

    /// Fetch an add-on by ID.
    pub async fn addon_info(&self, id: &str) -> Result<Addon> {
        self.get(&format!("/addons/{id}")).await
    }

    /// Change an add-on to another plan.
    pub async fn addon_update(&self, app: &str, id: &str, plan: &str) -> Result<Addon> {
        self.patch(
            &format!("/apps/{app}/addons/{id}"),
            &AddonUpdatePayload { plan },
        )
        .await
    }

    /// Deprovision an add-on.
    pub async fn addon_delete(&self, app: &str, id: &str) -> Result<()> {
        self.delete(&format!("/apps/{app}/addons/{id}")).await
    }

    /// Attach an existing add-on to an app.
    pub async fn attachment_create(
        &self,
        payload: &AttachmentCreatePayload,
    ) -> Result<AddonAttachment> {
        self.post("/addon-attachments", payload).await
    }

    /// Fetch an attachment by ID.
    pub async fn attachment_info(&self, id: &str) -> Result<AddonAttachment> {
        self.get(&format!("/addon-attachments/{id}")).await
    }

    /// Detach an add-on from an app.
    pub async fn attachment_delete(&self, id: &str) -> Result<()> {
        self.delete(&format!("/addon-attachments/{id}")).await
    }
}
