//! The `addon_attachment` resource
//!
//! Attachments have no mutable fields; every change means detaching and
//! re-attaching, so update only validates that nothing moved.

use async_trait::async_trait;
use heroku_api::Heroku;
use heroku_api::addons::{AddonAttachment, AttachmentCreatePayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::handler::{ResourceHandler, ResourceRecord, decode_config, ignore_missing, optional};

const TYPE: &str = "addon_attachment";

/// Desired state. All fields are create-only.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AttachmentConfig {
    /// Add-on name or UUID.
    addon: String,
    /// App name or UUID to attach to.
    app: String,
    /// Attachment name; the platform assigns one when omitted.
    name: Option<String>,
}

/// Tracked attributes. `addon` and `app` are echoed as given; the IDs and
/// the effective name come from the platform.
#[derive(Debug, Serialize, Deserialize)]
struct AttachmentAttributes {
    addon: String,
    app: String,
    addon_id: String,
    app_id: String,
    name: Option<String>,
}

fn record(attachment: &AddonAttachment, addon: String, app: String) -> Result<ResourceRecord> {
    ResourceRecord::new(
        attachment.id.clone(),
        &AttachmentAttributes {
            addon,
            app,
            addon_id: attachment.addon.id.clone(),
            app_id: attachment.app.id.clone(),
            name: attachment.name.clone(),
        },
    )
}

pub struct AddonAttachmentHandler;

#[async_trait]
impl ResourceHandler for AddonAttachmentHandler {
    fn type_name(&self) -> &'static str {
        TYPE
    }

    async fn create(&self, api: &Heroku, desired: &Value) -> Result<ResourceRecord> {
        let config: AttachmentConfig = decode_config(TYPE, desired)?;
        let payload = AttachmentCreatePayload {
            addon: config.addon.clone(),
            app: config.app.clone(),
            name: config.name.clone(),
        };
        let created = api
            .attachment_create(&payload)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(
            addon = %created.addon.name,
            app = %created.app.name,
            "attached add-on"
        );

        let attachment = api
            .attachment_info(&created.id)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        record(&attachment, config.addon, config.app)
    }

    async fn read(&self, api: &Heroku, rec: &ResourceRecord) -> Result<Option<ResourceRecord>> {
        let current: AttachmentAttributes = rec.attributes_as()?;
        match optional(TYPE, api.attachment_info(&rec.id).await)? {
            Some(attachment) => Ok(Some(record(&attachment, current.addon, current.app)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        _api: &Heroku,
        rec: &ResourceRecord,
        desired: &Value,
    ) -> Result<ResourceRecord> {
        let config: AttachmentConfig = decode_config(TYPE, desired)?;
        let current: AttachmentAttributes = rec.attributes_as()?;

        if config.addon != current.addon {
            return Err(ProviderError::immutable(TYPE, "addon"));
        }
        if config.app != current.app {
            return Err(ProviderError::immutable(TYPE, "app"));
        }
        if config.name.is_some() && config.name != current.name {
            return Err(ProviderError::immutable(TYPE, "name"));
        }
        Ok(rec.clone())
    }

    async fn delete(&self, api: &Heroku, rec: &ResourceRecord) -> Result<()> {
        ignore_missing(TYPE, api.attachment_delete(&rec.id).await)?;
        tracing::info!(id = %rec.id, "detached add-on");
        Ok(())
    }
}
