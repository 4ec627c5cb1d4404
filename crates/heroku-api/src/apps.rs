//! App endpoints
//!
//! <https://devcenter.heroku.com/articles/platform-api-reference#app>

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Heroku;
use crate::error::Result;

/// A Heroku app.
#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    pub web_url: Option<String>,
    pub git_url: Option<String>,
    pub region: Region,
    pub stack: Stack,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stack {
    pub id: String,
    pub name: String,
}

/// Fields accepted by app creation. All optional; the platform fills in
/// defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppCreatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Fields accepted by app update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_stack: Option<String>,
}

impl Heroku {
    /// Create an app.
    pub async fn app_create(&self, payload: &AppCreatePayload) -> Result<App> {
        self.post("/apps", payload).await
    }

    /// Fetch an app by ID or name.
    pub async fn app_info(&self, id_or_name: &str) -> Result<App> {
        self.get(&format!("/apps/{id_or_name}")).await
    }

    /// Rename an app and/or move it to another build stack.
    pub async fn app_update(&self, id_or_name: &str, payload: &AppUpdatePayload) -> Result<App> {
        self.patch(&format!("/apps/{id_or_name}"), payload).await
    }

    /// Delete an app.
    pub async fn app_delete(&self, id_or_name: &str) -> Result<()> {
        self.delete(&format!("/apps/{id_or_name}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ACCEPT_HEADER, ClientOptions};
    use crate::credentials::Credentials;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> Heroku {
        let credentials = Credentials {
            email: "user@example.com".to_string(),
            api_key: "test-key".to_string(),
            headers: Default::default(),
        };
        Heroku::with_options(
            credentials,
            ClientOptions {
                base_url: server.uri(),
                log_requests: false,
            },
        )
        .unwrap()
    }

    fn app_body(name: &str) -> serde_json::Value {
        json!({
            "id": "a1000000-0000-4000-8000-000000000001",
            "name": name,
            "web_url": format!("https://{name}.herokuapp.com/"),
            "git_url": format!("https://git.heroku.com/{name}.git"),
            "region": {"id": "r1", "name": "eu"},
            "stack": {"id": "s1", "name": "heroku-24"},
            "created_at": "2024-01-01T12:00:00Z",
            "updated_at": "2024-01-02T12:00:00Z",
            "maintenance": false
        })
    }

    #[tokio::test]
    async fn create_sends_requested_fields_and_decodes_the_app() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apps"))
            .and(header("accept", ACCEPT_HEADER))
            .and(body_json(json!({"name": "example", "region": "eu"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(app_body("example")))
            .expect(1)
            .mount(&server)
            .await;

        let payload = AppCreatePayload {
            name: Some("example".to_string()),
            region: Some("eu".to_string()),
            stack: None,
        };
        let app = client(&server).await.app_create(&payload).await.unwrap();
        assert_eq!(app.name, "example");
        assert_eq!(app.region.name, "eu");
        assert_eq!(app.stack.name, "heroku-24");
        assert_eq!(app.web_url.as_deref(), Some("https://example.herokuapp.com/"));
    }

    #[tokio::test]
    async fn info_on_missing_app_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "id": "not_found",
                "message": "Couldn't find that app."
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.app_info("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_patches_name_and_build_stack() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/apps/example"))
            .and(body_json(json!({"name": "renamed", "build_stack": "heroku-24"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(app_body("renamed")))
            .expect(1)
            .mount(&server)
            .await;

        let payload = AppUpdatePayload {
            name: Some("renamed".to_string()),
            build_stack: Some("heroku-24".to_string()),
        };
        let app = client(&server)
            .await
            .app_update("example", &payload)
            .await
            .unwrap();
        assert_eq!(app.name, "renamed");
    }

    #[tokio::test]
    async fn delete_ignores_the_response_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/apps/example"))
            .respond_with(ResponseTemplate::new(200).set_body_json(app_body("example")))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).await.app_delete("example").await.unwrap();
    }
}
