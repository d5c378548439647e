//! Common test utilities for integration tests
//!
//! This module provides a router wired to an in-memory provider.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use toastspeech_backend::{
    config::{AppConfig, JwtConfig, ProviderConfig, ServerConfig},
    provider::InMemoryProvider,
    routes,
    state::AppState,
};
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub provider: Arc<InMemoryProvider>,
}

impl TestApp {
    /// Create a new test application backed by an in-memory provider
    pub fn new() -> Self {
        let provider = Arc::new(InMemoryProvider::new());
        let state = AppState::new(provider.clone(), test_config());
        let app = routes::create_router(state.clone());

        Self {
            app,
            state,
            provider,
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a GET request with a bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        provider: ProviderConfig {
            url: "http://provider.invalid".to_string(),
            service_key: "test-service-key".to_string(),
            timeout_secs: 5,
        },
        jwt: JwtConfig {
            secret: "test-secret-key-for-testing-only-32chars".to_string(),
            access_token_expiry_secs: 1800,
        },
    }
}
