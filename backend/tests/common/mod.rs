//! Common test utilities for integration tests
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! regeneration store is in memory unless a test passes its own.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use coach_backend::{
    config::AppConfig,
    repositories::{InMemoryRegenerationStore, RegenerationStore},
    routes,
    services::{analytics::NoopSink, AnalyticsService, AnalyticsSink},
    state::AppState,
};
use std::sync::Arc;
use tower::ServiceExt;

/// Response pieces a test usually asserts on
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
}

impl TestApp {
    /// Create a test application with an in-memory store and a no-op sink
    pub fn new() -> Self {
        Self::with_parts(
            AppConfig::default(),
            Arc::new(InMemoryRegenerationStore::new()),
            Arc::new(NoopSink),
        )
    }

    pub fn with_parts(
        config: AppConfig,
        store: Arc<dyn RegenerationStore>,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Self {
        let state = AppState::new(config, store, AnalyticsService::new(sink), None).unwrap();
        Self {
            app: routes::create_router(state),
        }
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        self.send(request).await
    }

    /// Send a fully built request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(body.to_vec()).unwrap(),
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }
}

/// Calorie request body for a 30yo male, 180cm, 80kg, moderately active,
/// losing weight; `overrides` replaces individual fields
pub fn calorie_body(overrides: serde_json::Value) -> String {
    let mut body = serde_json::json!({
        "age": 30,
        "gender": "male",
        "height_cm": 180,
        "weight_kg": 80,
        "goal_weight_kg": 75,
        "activity_level": "Moderately active",
        "goal_type": "lose",
        "goal_timeframe_weeks": 8
    });
    if let (Some(base), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
        for (key, value) in extra {
            base.insert(key.clone(), value.clone());
        }
    }
    body.to_string()
}
