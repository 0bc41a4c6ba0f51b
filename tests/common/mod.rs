// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{FixedOffset, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use stride_tracker::config::Config;
use stride_tracker::db::{JsonStore, PersistedState};
use stride_tracker::routes::create_router;
use stride_tracker::time_utils::ManualClock;
use stride_tracker::AppState;
use tower::ServiceExt;

/// Create a test app with a manual clock and a store that keeps nothing.
/// Returns the router, the shared state and the clock.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<ManualClock>) {
    create_test_app_with(PersistedState::default())
}

#[allow(dead_code)]
pub fn create_test_app_with(
    saved: PersistedState,
) -> (axum::Router, Arc<AppState>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap(),
    ));
    let state = Arc::new(AppState::new(
        Config::test_default(),
        clock.clone(),
        FixedOffset::east_opt(0).unwrap(),
        JsonStore::new_mock(),
        saved,
    ));
    (create_router(state.clone()), state, clock)
}

/// Send a request and decode the JSON response body (Null if empty).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[allow(dead_code)]
pub async fn send_raw(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Poll until the current activity has `points` route points.
#[allow(dead_code)]
pub async fn wait_for_route_len(state: &AppState, points: usize) {
    for _ in 0..100 {
        let len = state
            .tracker
            .lock()
            .await
            .current()
            .map(|a| a.route.len())
            .unwrap_or(0);
        if len >= points {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("route never reached {} points", points);
}
