//! Common test utilities for integration tests
//!
//! Builds the full router over an in-memory store and drives it with
//! `tower::Service::call`, so no database or network is needed.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chirpy_api::app::{build_router, AppState};
use chirpy_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, Platform, PolkaConfig};
use chirpy_shared::store::memory::MemoryStore;
use serde_json::{json, Value};
use tower::Service as _;

pub const JWT_SECRET: &str = "integration-test-secret-that-is-long-enough";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// Test context containing the router and its backing store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub config: Config,
}

/// Status and raw body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response body is not JSON ({}): {}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub fn test_config(platform: Platform) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            platform,
            fileserver_root: concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures").to_string(),
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        polka: PolkaConfig {
            api_key: POLKA_KEY.to_string(),
        },
    }
}

impl TestContext {
    /// Production platform (reset disabled)
    pub fn new() -> Self {
        Self::with_platform(Platform::Prod)
    }

    pub fn with_platform(platform: Platform) -> Self {
        let config = test_config(platform);
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config.clone());

        Self {
            store,
            app: build_router(state),
            config,
        }
    }

    /// Sends a request through the router
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .call(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse { status, body }
    }

    /// Registers a user and returns the response JSON
    pub async fn register(&self, email: &str, password: &str) -> Value {
        let response = self
            .send(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()
    }

    pub async fn login_response(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Logs in and returns the response JSON
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self.login_response(email, password).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.json()
    }

    /// Registers and logs in; returns (user ID, session token, refresh token)
    pub async fn sign_up(&self, email: &str, password: &str) -> (String, String, String) {
        self.register(email, password).await;
        let login = self.login(email, password).await;

        (
            login["id"].as_str().unwrap().to_string(),
            login["token"].as_str().unwrap().to_string(),
            login["refresh_token"].as_str().unwrap().to_string(),
        )
    }
}

/// `Authorization` value for a bearer token
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
