use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use user_service::{
    build_router, AppState, InMemoryUserRepository, TokenClaims, TokenConfig, UserModel,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_ISSUER: &str = "integration-issuer";
pub const TEST_AUDIENCE: &str = "integration-audience";

pub fn token_config(secret: &str, issuer: &str, audience: &str) -> TokenConfig {
    TokenConfig::new(
        secret.to_string(),
        issuer.to_string(),
        audience.to_string(),
        "testuser".to_string(),
        30,
    )
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub token_config: TokenConfig,
}

pub struct TestAppBuilder {
    users: Vec<UserModel>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self { users: vec![] }
    }

    pub fn with_users(mut self, names: Vec<&str>) -> Self {
        self.users = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| UserModel::new(i as i64 + 1, name))
            .collect();
        self
    }

    pub fn build(self) -> TestApp {
        let token_config = token_config(TEST_SECRET, TEST_ISSUER, TEST_AUDIENCE);
        let repository = Arc::new(InMemoryUserRepository::with_users(self.users));
        let state = AppState::new(repository, token_config.clone());

        TestApp {
            router: build_router(state),
            token_config,
        }
    }
}

impl TestApp {
    /// A valid token minted by the app's own issuer
    pub fn token(&self) -> String {
        self.token_config.create_token().unwrap()
    }

    /// A token signed with the app's key after `tweak` edits its claims
    pub fn token_with(&self, tweak: impl FnOnce(&mut TokenClaims)) -> String {
        let mut claims = self.token_config.issue_claims().unwrap();
        tweak(&mut claims);
        self.token_config.sign(&claims).unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Sends an authenticated request
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let token = self.token();
        self.send(method, uri, body, Some(&token)).await
    }

    pub async fn create(&self, name: &str) -> TestResponse {
        self.call(
            Method::POST,
            "/users",
            Some(serde_json::json!({ "name": name })),
        )
        .await
    }
}
