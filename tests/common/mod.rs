// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use workout_tracker::config::Config;
use workout_tracker::db::{KeyValueStore, MemoryStore};
use workout_tracker::routes::create_router;
use workout_tracker::services::ActivityStore;
use workout_tracker::AppState;

/// Fixed creation time so descriptions are predictable.
#[allow(dead_code)]
pub fn test_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 14, 8, 0, 0).unwrap()
}

/// Create a test app over the given storage backend.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app_with<S>(storage: S) -> (axum::Router, Arc<AppState>)
where
    S: KeyValueStore + 'static,
{
    let store = ActivityStore::new(Arc::new(storage)).with_clock(test_clock);
    let state = Arc::new(AppState::new(Config::test_default(), store));
    (create_router(state.clone()), state)
}

/// Create a test app with fresh in-memory storage.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(MemoryStore::new())
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request with a raw body and the given content type.
#[allow(dead_code)]
pub fn raw_request(method: &str, uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request without a body.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
