/// Common test utilities for integration tests
///
/// Shared infrastructure for driving the router end-to-end over the
/// in-memory store: context construction, request helpers, and user
/// registration shortcuts.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use serde_json::{json, Value};
use teamtask_api::app::{build_router, AppState};
use teamtask_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use teamtask_shared::store::MemStore;
use tower::Service as _;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-key-32-bytes!";

/// Test context containing the router and its backing store
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemStore>,
}

impl TestContext {
    /// Creates a new test context over a fresh in-memory store
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://unused/test".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
        };

        let store = Arc::new(MemStore::new());
        let state = AppState::new(store.clone(), config);
        let app = build_router(state);

        TestContext { app, store }
    }

    /// Sends a JSON request, optionally authenticated
    pub async fn request(
        &mut self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.call(request).await.unwrap()
    }

    /// Registers a user and returns (user_id, access_token)
    pub async fn register(&mut self, username: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/v1/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "password": "password-123"
                })),
            )
            .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        (
            body["user_id"].as_str().unwrap().to_string(),
            body["access_token"].as_str().unwrap().to_string(),
        )
    }
}

/// Reads a response body as JSON
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
