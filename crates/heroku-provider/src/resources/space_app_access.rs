//! The `space_app_access` resource
//!
//! Grants a team member app-creation permissions inside a space. The
//! platform has no create or delete endpoint for this: granting is a PATCH
//! of the member's permission list, revoking is a PATCH with an empty list.
//! The external identifier is `<space uuid>:<email>`.

use async_trait::async_trait;
use heroku_api::Heroku;
use heroku_api::spaces::SpaceAppAccess;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::handler::{ResourceHandler, ResourceRecord, decode_config, optional};
use crate::id::{build_composite_id, parse_composite_id};

const TYPE: &str = "space_app_access";

/// Desired state.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpaceAppAccessConfig {
    /// Space name or UUID; create-only.
    space: String,
    /// Member email; create-only.
    email: String,
    /// Permission names, e.g. `create_apps`. Order is irrelevant.
    #[serde(default)]
    permissions: Vec<String>,
}

/// Tracked attributes. `space` is echoed as given; the IDs come from the
/// platform. Permissions are kept sorted so comparisons are stable.
#[derive(Debug, Serialize, Deserialize)]
struct SpaceAppAccessAttributes {
    space: String,
    email: String,
    space_id: String,
    user_id: String,
    permissions: Vec<String>,
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort_unstable();
    names
}

fn permission_names(access: &SpaceAppAccess) -> Vec<String> {
    sorted(
        access
            .permissions
            .iter()
            .map(|permission| permission.name.clone())
            .collect(),
    )
}

fn record(access: &SpaceAppAccess, space: String) -> Result<ResourceRecord> {
    ResourceRecord::new(
        build_composite_id(&access.space.id, &access.user.email),
        &SpaceAppAccessAttributes {
            space,
            email: access.user.email.clone(),
            space_id: access.space.id.clone(),
            user_id: access.user.id.clone(),
            permissions: permission_names(access),
        },
    )
}

pub struct SpaceAppAccessHandler;

#[async_trait]
impl ResourceHandler for SpaceAppAccessHandler {
    fn type_name(&self) -> &'static str {
        TYPE
    }

    async fn create(&self, api: &Heroku, desired: &Value) -> Result<ResourceRecord> {
        let config: SpaceAppAccessConfig = decode_config(TYPE, desired)?;
        api.space_app_access_update(&config.space, &config.email, &config.permissions)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(
            space = %config.space,
            member = %config.email,
            granted = config.permissions.len(),
            "granted space app access"
        );

        let access = api
            .space_app_access_info(&config.space, &config.email)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        record(&access, config.space)
    }

    async fn read(&self, api: &Heroku, rec: &ResourceRecord) -> Result<Option<ResourceRecord>> {
        let current: SpaceAppAccessAttributes = rec.attributes_as()?;
        let (space_id, email) = parse_composite_id(&rec.id)?;
        match optional(TYPE, api.space_app_access_info(space_id, email).await)? {
            Some(access) => Ok(Some(record(&access, current.space)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        api: &Heroku,
        rec: &ResourceRecord,
        desired: &Value,
    ) -> Result<ResourceRecord> {
        let config: SpaceAppAccessConfig = decode_config(TYPE, desired)?;
        let current: SpaceAppAccessAttributes = rec.attributes_as()?;

        if config.space != current.space {
            return Err(ProviderError::immutable(TYPE, "space"));
        }
        if config.email != current.email {
            return Err(ProviderError::immutable(TYPE, "email"));
        }
        let desired_permissions = sorted(config.permissions);
        if desired_permissions == current.permissions {
            return Ok(rec.clone());
        }

        let (space_id, email) = parse_composite_id(&rec.id)?;
        let access = api
            .space_app_access_update(space_id, email, &desired_permissions)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(
            space = %current.space,
            member = %email,
            granted = desired_permissions.len(),
            "updated space app access"
        );
        record(&access, current.space)
    }

    async fn delete(&self, api: &Heroku, rec: &ResourceRecord) -> Result<()> {
        let (space_id, email) = parse_composite_id(&rec.id)?;
        match api.space_app_access_update(space_id, email, &[]).await {
            Ok(_) => {
                tracing::info!(space = %space_id, member = %email, "revoked space app access");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(ProviderError::api(TYPE, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SPACE_ID: &str = "s1000000-0000-4000-8000-000000000001";
    const EMAIL: &str = "dev@example.com";

    fn access_body(permissions: &[&str]) -> serde_json::Value {
        json!({
            "space": {"id": SPACE_ID, "name": "prod-space"},
            "user": {"id": "u1000000-0000-4000-8000-000000000001", "email": EMAIL},
            "permissions": permissions
                .iter()
                .map(|name| json!({"name": name, "description": null}))
                .collect::<Vec<_>>(),
            "created_at": "2024-01-01T12:00:00Z",
            "updated_at": "2024-01-01T12:00:00Z"
        })
    }

    fn tracked() -> ResourceRecord {
        ResourceRecord::new(
            build_composite_id(SPACE_ID, EMAIL),
            &SpaceAppAccessAttributes {
                space: "prod-space".to_string(),
                email: EMAIL.to_string(),
                space_id: SPACE_ID.to_string(),
                user_id: "u1000000-0000-4000-8000-000000000001".to_string(),
                permissions: vec!["create_apps".to_string()],
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_grants_and_builds_the_composite_id() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/spaces/prod-space/members/{EMAIL}")))
            .and(body_json(json!({"permissions": [{"name": "create_apps"}]})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(access_body(&["create_apps"])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/spaces/prod-space/members/{EMAIL}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(access_body(&["create_apps"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = testing::client(&server);
        let desired = json!({
            "space": "prod-space",
            "email": EMAIL,
            "permissions": ["create_apps"]
        });
        let record = SpaceAppAccessHandler.create(&api, &desired).await.unwrap();

        assert_eq!(record.id, format!("{SPACE_ID}:{EMAIL}"));
        assert_eq!(record.attributes["space_id"], json!(SPACE_ID));
        assert_eq!(
            record.attributes["user_id"],
            json!("u1000000-0000-4000-8000-000000000001")
        );
        assert_eq!(record.attributes["permissions"], json!(["create_apps"]));
    }

    #[tokio::test]
    async fn permission_order_does_not_trigger_an_update() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/spaces/{SPACE_ID}/members/{EMAIL}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(access_body(&[])))
            .expect(0)
            .mount(&server)
            .await;

        let mut rec = tracked();
        rec.attributes["permissions"] = json!(["create_apps", "manage"]);
        let api = testing::client(&server);
        let desired = json!({
            "space": "prod-space",
            "email": EMAIL,
            "permissions": ["manage", "create_apps"]
        });
        let record = SpaceAppAccessHandler
            .update(&api, &rec, &desired)
            .await
            .unwrap();
        assert_eq!(record, rec);
    }

    #[tokio::test]
    async fn permission_change_patches_the_member() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/spaces/{SPACE_ID}/members/{EMAIL}")))
            .and(body_json(json!({"permissions": [{"name": "create_apps"}, {"name": "manage"}]})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(access_body(&["create_apps", "manage"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = testing::client(&server);
        let desired = json!({
            "space": "prod-space",
            "email": EMAIL,
            "permissions": ["manage", "create_apps"]
        });
        let record = SpaceAppAccessHandler
            .update(&api, &tracked(), &desired)
            .await
            .unwrap();
        assert_eq!(
            record.attributes["permissions"],
            json!(["create_apps", "manage"])
        );
    }

    #[tokio::test]
    async fn read_on_a_removed_member_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/spaces/{SPACE_ID}/members/{EMAIL}")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "id": "not_found",
                "message": "Couldn't find that member."
            })))
            .mount(&server)
            .await;

        let api = testing::client(&server);
        let result = SpaceAppAccessHandler.read(&api, &tracked()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_revokes_with_an_empty_permission_list() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/spaces/{SPACE_ID}/members/{EMAIL}")))
            .and(body_json(json!({"permissions": []})))
            .respond_with(ResponseTemplate::new(200).set_body_json(access_body(&[])))
            .expect(1)
            .mount(&server)
            .await;

        let api = testing::client(&server);
        SpaceAppAccessHandler.delete(&api, &tracked()).await.unwrap();
    }

    #[tokio::test]
    async fn changing_the_member_is_immutable() {
        let server = MockServer::start().await;
        let api = testing::client(&server);
        let desired = json!({
            "space": "prod-space",
            "email": "other@example.com",
            "permissions": ["create_apps"]
        });
        let err = SpaceAppAccessHandler
            .update(&api, &tracked(), &desired)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Immutable {
                resource: "space_app_access",
                field: "email"
            }
        ));
    }

    #[tokio::test]
    async fn corrupt_composite_id_is_invalid_state() {
        let server = MockServer::start().await;
        let api = testing::client(&server);
        let rec = ResourceRecord {
            id: "no-separator".to_string(),
            attributes: tracked().attributes,
        };
        let err = SpaceAppAccessHandler.read(&api, &rec).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidState(_)));
    }
}
