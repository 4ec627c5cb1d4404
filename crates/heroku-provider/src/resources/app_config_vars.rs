//! The `app_config_vars` resource
//!
//! Manages a tracked subset of an app's config vars in two groups: public
//! and private. Untracked keys (set by add-ons or by hand) are left alone.
//! Private values stay out of logs; only key counts are logged.

use std::collections::HashMap;

use async_trait::async_trait;
use heroku_api::Heroku;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::handler::{ResourceHandler, ResourceRecord, decode_config, optional};
use crate::reconcile::{Vars, diff_config_vars};

const TYPE: &str = "app_config_vars";

/// Desired state. The record tracks exactly the keys named here.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigVarsConfig {
    /// App name or UUID; create-only.
    app: String,
    #[serde(default)]
    public: Vars,
    #[serde(default)]
    private: Vars,
}

/// Tracked attributes. `app` is echoed as given; the record id pins the
/// app's UUID.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigVarsAttributes {
    app: String,
    public: Vars,
    private: Vars,
}

/// Keep the desired grouping, taking each tracked key's value from the
/// platform's map; keys missing remotely drop out.
fn tracked_group(desired: &Vars, remote: &HashMap<String, String>) -> Vars {
    desired
        .keys()
        .filter_map(|key| remote.get(key).map(|value| (key.clone(), value.clone())))
        .collect()
}

pub struct AppConfigVarsHandler;

#[async_trait]
impl ResourceHandler for AppConfigVarsHandler {
    fn type_name(&self) -> &'static str {
        TYPE
    }

    async fn create(&self, api: &Heroku, desired: &Value) -> Result<ResourceRecord> {
        let config: ConfigVarsConfig = decode_config(TYPE, desired)?;
        let changes = diff_config_vars(&Vars::new(), &Vars::new(), &config.public, &config.private)?;

        // Pin the app's UUID so later renames cannot detach the record.
        let app = api
            .app_info(&config.app)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;

        let remote = if changes.is_empty() {
            HashMap::new()
        } else {
            let applied = api
                .config_var_update(&app.id, &changes)
                .await
                .map_err(|e| ProviderError::api(TYPE, e))?;
            tracing::info!(app = %app.name, set = changes.len(), "set config vars");
            applied
        };

        ResourceRecord::new(
            app.id,
            &ConfigVarsAttributes {
                app: config.app,
                public: tracked_group(&config.public, &remote),
                private: tracked_group(&config.private, &remote),
            },
        )
    }

    async fn read(&self, api: &Heroku, rec: &ResourceRecord) -> Result<Option<ResourceRecord>> {
        let current: ConfigVarsAttributes = rec.attributes_as()?;
        let remote = match optional(TYPE, api.config_var_info(&rec.id).await)? {
            Some(remote) => remote,
            None => return Ok(None),
        };
        Ok(Some(ResourceRecord::new(
            rec.id.clone(),
            &ConfigVarsAttributes {
                app: current.app,
                public: tracked_group(&current.public, &remote),
                private: tracked_group(&current.private, &remote),
            },
        )?))
    }

    async fn update(
        &self,
        api: &Heroku,
        rec: &ResourceRecord,
        desired: &Value,
    ) -> Result<ResourceRecord> {
        let config: ConfigVarsConfig = decode_config(TYPE, desired)?;
        let current: ConfigVarsAttributes = rec.attributes_as()?;
        if config.app != current.app {
            return Err(ProviderError::immutable(TYPE, "app"));
        }

        let changes = diff_config_vars(
            &current.public,
            &current.private,
            &config.public,
            &config.private,
        )?;
        if changes.is_empty() {
            return Ok(rec.clone());
        }

        let removed = changes.values().filter(|value| value.is_none()).count();
        let remote = api
            .config_var_update(&rec.id, &changes)
            .await
            .map_err(|e| ProviderError::api(TYPE, e))?;
        tracing::info!(
            app = %current.app,
            set = changes.len() - removed,
            removed,
            "updated config vars"
        );

        ResourceRecord::new(
            rec.id.clone(),
            &ConfigVarsAttributes {
                app: current.app,
                public: tracked_group(&config.public, &remote),
                private: tracked_group(&config.private, &remote),
            },
        )
    }

    async fn delete(&self, api: &Heroku, rec: &ResourceRecord) -> Result<()> {
        let current: ConfigVarsAttributes = rec.attributes_as()?;
        let removals: HashMap<String, Option<String>> = current
            .public
            .keys()
            .chain(current.private.keys())
            .map(|key| (key.clone(), None))
            .collect();
        if removals.is_empty() {
            return Ok(());
        }

        match api.config_var_update(&rec.id, &removals).await {
            Ok(_) => {
                tracing::info!(app = %current.app, removed = removals.len(), "removed config vars");
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

    const APP_ID: &str = "a1000000-0000-4000-8000-000000000001";

    fn tracked() -> ResourceRecord {
        ResourceRecord::new(
            APP_ID,
            &ConfigVarsAttributes {
                app: "example".to_string(),
                public: [("A".to_string(), "1".to_string())].into(),
                private: [("S".to_string(), "hush".to_string())].into(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_pins_the_app_uuid_and_tracks_both_groups() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps/example"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": APP_ID,
                "name": "example",
                "web_url": null,
                "git_url": null,
                "region": {"id": "r1", "name": "eu"},
                "stack": {"id": "s1", "name": "heroku-24"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(format!("/apps/{APP_ID}/config-vars")))
            .and(body_json(json!({"A": "1", "S": "hush"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "A": "1",
                "S": "hush",
                "FROM_ADDON": "untracked"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = testing::client(&server);
        let desired = json!({
            "app": "example",
            "public": {"A": "1"},
            "private": {"S": "hush"}
        });
        let record = AppConfigVarsHandler.create(&api, &desired).await.unwrap();

        assert_eq!(record.id, APP_ID);
        assert_eq!(record.attributes["public"], json!({"A": "1"}));
        assert_eq!(record.attributes["private"], json!({"S": "hush"}));
        assert_eq!(record.attributes["app"], json!("example"));
    }

    #[tokio::test]
    async fn overlapping_groups_fail_before_any_api_call() {
        let server = MockServer::start().await;
        let api = testing::client(&server);
        let desired = json!({
            "app": "example",
            "public": {"A": "1"},
            "private": {"A": "2"}
        });
        let err = AppConfigVarsHandler.create(&api, &desired).await.unwrap_err();
        match err {
            ProviderError::InvalidConfig(message) => assert!(message.contains('A')),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn second_apply_of_the_same_state_issues_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/apps/{APP_ID}/config-vars")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let api = testing::client(&server);
        let desired = json!({
            "app": "example",
            "public": {"A": "1"},
            "private": {"S": "hush"}
        });
        let record = AppConfigVarsHandler
            .update(&api, &tracked(), &desired)
            .await
            .unwrap();
        assert_eq!(record, tracked());
    }

    #[tokio::test]
    async fn keys_dropped_from_the_desired_state_are_deleted() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/apps/{APP_ID}/config-vars")))
            .and(body_json(json!({"S": null})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"A": "1"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = testing::client(&server);
        let desired = json!({"app": "example", "public": {"A": "1"}});
        let record = AppConfigVarsHandler
            .update(&api, &tracked(), &desired)
            .await
            .unwrap();
        assert_eq!(record.attributes["public"], json!({"A": "1"}));
        assert_eq!(record.attributes["private"], json!({}));
    }

    #[tokio::test]
    async fn read_refreshes_tracked_keys_and_ignores_the_rest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/apps/{APP_ID}/config-vars")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "A": "9",
                "FROM_ADDON": "untracked"
            })))
            .mount(&server)
            .await;

        let api = testing::client(&server);
        let record = AppConfigVarsHandler
            .read(&api, &tracked())
            .await
            .unwrap()
            .unwrap();
        // A drifted remotely, S was deleted remotely, FROM_ADDON stays
        // untracked.
        assert_eq!(record.attributes["public"], json!({"A": "9"}));
        assert_eq!(record.attributes["private"], json!({}));
    }

    #[tokio::test]
    async fn read_on_a_deleted_app_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/apps/{APP_ID}/config-vars")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "id": "not_found",
                "message": "Couldn't find that app."
            })))
            .mount(&server)
            .await;

        let api = testing::client(&server);
        let result = AppConfigVarsHandler.read(&api, &tracked()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn app_change_is_immutable() {
        let server = MockServer::start().await;
        let api = testing::client(&server);
        let desired = json!({"app": "other-app", "public": {"A": "1"}});
        let err = AppConfigVarsHandler
            .update(&api, &tracked(), &desired)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Immutable {
                resource: "app_config_vars",
                field: "app"
            }
        ));
    }

    #[tokio::test]
    async fn delete_nulls_every_tracked_key() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/apps/{APP_ID}/config-vars")))
            .and(body_json(json!({"A": null, "S": null})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let api = testing::client(&server);
        AppConfigVarsHandler.delete(&api, &tracked()).await.unwrap();
    }

    #[tokio::test]
    async fn delete_on_a_missing_app_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/apps/{APP_ID}/config-vars")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "id": "not_found",
                "message": "Couldn't find that app."
            })))
            .mount(&server)
            .await;

        let api = testing::client(&server);
        AppConfigVarsHandler.delete(&api, &tracked()).await.unwrap();
    }
}
