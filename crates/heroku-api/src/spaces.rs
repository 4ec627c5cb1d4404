//! Private space endpoints
//!
//! Space allocation is asynchronous: a freshly created space reports state
//! `allocating` until the platform finishes provisioning. Callers decide
//! whether to wait; nothing here polls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::apps::Region;
use crate::client::Heroku;
use crate::error::Result;

/// A private space.
#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    pub team: Option<TeamRef>,
    pub region: Region,
    /// `allocating`, `allocated` or `deleting`.
    pub state: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
}

/// A team member's app-creation permissions inside a space.
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceAppAccess {
    pub space: SpaceRef,
    pub user: UserRef,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpaceRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Permission {
    pub name: String,
    pub description: Option<String>,
}

/// Fields accepted by space creation.
#[derive(Debug, Clone, Serialize)]
pub struct SpaceCreatePayload {
    pub name: String,
    pub team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Serialize)]
struct SpaceUpdatePayload<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct PermissionsPayload {
    permissions: Vec<PermissionRef>,
}

#[derive(Serialize)]
struct PermissionRef {
    name: String,
}

impl Heroku {
    /// Create a space for a team.
    pub async fn space_create(&self, payload: &SpaceCreatePayload) -> Result<Space> {
        self.post("/spaces", payload).await
    }

    /// Fetch a space by ID or name.
    pub async fn space_info(&self, id_or_name: &str) -> Result<Space> {
        self.get(&format!("/spaces/{id_or_name}")).await
    }

    /// Rename a space.
    pub async fn space_update(&self, id_or_name: &str, name: &str) -> Result<Space> {
        self.patch(&format!("/spaces/{id_or_name}"), &SpaceUpdatePayload { name })
            .await
    }

    /// Delete a space.
    pub async fn space_delete(&self, id_or_name: &str) -> Result<()> {
        self.delete(&format!("/spaces/{id_or_name}")).await
    }

    /// Fetch a member's permissions inside a space.
    pub async fn space_app_access_info(
        &self,
        space: &str,
        email: &str,
    ) -> Result<SpaceAppAccess> {
        self.get(&format!("/spaces/{space}/members/{email}")).await
    }

    /// Replace a member's permissions inside a space. An empty list revokes
    /// all granted permissions.
    pub async fn space_app_access_update(
        &self,
        space: &str,
        email: &str,
        permissions: &[String],
    ) -> Result<SpaceAppAccess> {
        let payload = PermissionsPayload {
            permissions: permissions
                .iter()
                .map(|name| PermissionRef { name: name.clone() })
                .collect(),
        };
        self.patch(&format!("/spaces/{space}/members/{email}"), &payload)
            .await
    }
}
