use mmi_backend::{
    api::router::create_router,
    config::Config,
    infra::factory::bootstrap_state,
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const SUPERADMIN: &str = "root@test.org";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    /// Fresh in-memory database with only the superadmin.
    pub async fn new() -> Self {
        Self::with_config(Self::config(false)).await
    }

    /// Fresh in-memory database with the demo orgs, helpers and clients.
    pub async fn with_demo_data() -> Self {
        Self::with_config(Self::config(true)).await
    }

    fn config(seed_demo_data: bool) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            api_prefix: "/api".to_string(),
            log_dir: "./logs".to_string(),
            superadmin_username: SUPERADMIN.to_string(),
            seed_demo_data,
        }
    }

    async fn with_config(config: Config) -> Self {
        let state = Arc::new(
            bootstrap_state(&config)
                .await
                .expect("Failed to bootstrap test state"),
        );
        let router = create_router(state.clone());
        Self { router, state }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("PATCH", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn login(&self, username: &str) -> String {
        let (status, body) = self
            .request("POST", "/api/auth/login", None, Some(json!({ "username": username })))
            .await;
        if !status.is_success() {
            panic!("Login failed in test helper: status {}", status);
        }
        body["token"].as_str().expect("No token in login body").to_string()
    }

    pub async fn superadmin(&self) -> String {
        self.login(SUPERADMIN).await
    }

    /// Creates an org as superadmin and returns its id.
    pub async fn create_org(&self, admin_token: &str, name: &str) -> String {
        let (status, body) = self
            .post(
                "/api/orgs",
                admin_token,
                json!({
                    "name": name,
                    "mainContactName": "Main Contact",
                    "mainContactEmail": "contact@example.org"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create org failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a user in the org and returns the user's id.
    pub async fn create_user(
        &self,
        token: &str,
        org_id: &str,
        username: &str,
        user_type: &str,
        display_name: &str,
        needs: &[&str],
    ) -> String {
        let (status, body) = self
            .post(
                &format!("/api/orgs/{}/users", org_id),
                token,
                json!({
                    "username": username,
                    "userType": user_type,
                    "displayName": display_name,
                    "needs": needs
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_client(&self, token: &str, org_id: &str, name: &str, needs: &[&str]) -> String {
        let (status, body) = self
            .post(
                &format!("/api/orgs/{}/clients", org_id),
                token,
                json!({ "name": name, "needs": needs }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create client failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_connection(&self, token: &str, org_id: &str, client_id: &str, helper_id: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/api/orgs/{}/connections", org_id),
                token,
                json!({ "clientId": client_id, "helperId": helper_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create connection failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}
