// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! History, statistics, export, settings and planning endpoints.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use stride_tracker::models::{ActivityId, ActivityKind, Coordinate};
use stride_tracker::services::StopOutcome;
use stride_tracker::time_utils::ManualClock;
use stride_tracker::AppState;
use tower::ServiceExt;

mod common;

use common::{create_test_app, send};

/// Record a completed activity heading east along the equator,
/// one 0.001° leg per minute.
async fn record(state: &AppState, clock: &ManualClock, kind: ActivityKind, legs: usize) -> ActivityId {
    let mut tracker = state.tracker.lock().await;
    tracker.start(kind, Some(Coordinate::new(0.0, 0.0))).unwrap();
    for i in 1..=legs {
        clock.advance(Duration::seconds(60));
        assert!(tracker.add_sample(Coordinate::new(0.0, 0.001 * i as f64)));
    }
    match tracker.stop().unwrap() {
        StopOutcome::Completed(id) => id,
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_stats_today_excludes_yesterday() {
    let (app, state, clock) = create_test_app();

    clock.set(Utc.with_ymd_and_hms(2024, 5, 31, 18, 0, 0).unwrap());
    record(&state, &clock, ActivityKind::Walking, 1).await;

    clock.set(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
    record(&state, &clock, ActivityKind::Running, 2).await;
    clock.advance(Duration::hours(2));
    record(&state, &clock, ActivityKind::Cycling, 2).await;

    let (status, today) = send(&app, "GET", "/api/stats/today", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(today["date"], "2024-06-01");
    assert_eq!(today["activities"], 2);
    assert_eq!(today["duration_seconds"], 240.0);
    assert_eq!(today["calories"], 16 + 6);
    let distance = today["distance_meters"].as_f64().unwrap();
    assert!((distance - 444.78).abs() < 0.1, "distance {}", distance);

    let (_, yesterday) = send(&app, "GET", "/api/stats/day/2024-05-31", None).await;
    assert_eq!(yesterday["activities"], 1);
    assert_eq!(yesterday["calories"], 5);
}

#[tokio::test]
async fn test_week_stats_oldest_first() {
    let (app, state, clock) = create_test_app();
    record(&state, &clock, ActivityKind::Running, 3).await;

    let (status, week) = send(&app, "GET", "/api/stats/week", None).await;
    assert_eq!(status, StatusCode::OK);
    let days = week.as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["date"], "2024-05-26");
    assert_eq!(days[6]["date"], "2024-06-01");
    assert_eq!(days[6]["activities"], 1);
    assert_eq!(days[5]["activities"], 0);

    let (_, three) = send(&app, "GET", "/api/stats/week?days=3", None).await;
    assert_eq!(three.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, "GET", "/api/stats/week?days=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/api/stats/week?days=400", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_total_and_overview() {
    let (app, state, clock) = create_test_app();
    record(&state, &clock, ActivityKind::Running, 2).await;
    record(&state, &clock, ActivityKind::Running, 1).await;
    record(&state, &clock, ActivityKind::Walking, 4).await;

    let (_, total) = send(&app, "GET", "/api/stats/total", None).await;
    assert_eq!(total["total_activities"], 3);
    assert_eq!(total["total_duration_seconds"], 420.0);

    let (_, overview) = send(&app, "GET", "/api/stats/overview", None).await;
    assert_eq!(overview["total_activities"], 3);
    assert_eq!(overview["activities_by_kind"]["running"], 2);
    assert_eq!(overview["activities_by_kind"]["walking"], 1);
    assert_eq!(overview["longest_duration_seconds"], 240.0);
}

#[tokio::test]
async fn test_list_filters_and_limits() {
    let (app, state, clock) = create_test_app();
    record(&state, &clock, ActivityKind::Running, 1).await;
    record(&state, &clock, ActivityKind::Walking, 1).await;
    let latest = record(&state, &clock, ActivityKind::Running, 2).await;

    let (status, all) = send(&app, "GET", "/api/activities", None).await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["id"], latest.0);
    assert_eq!(all[0]["points"], 3);
    assert_eq!(all[0]["duration_label"], "2:00");
    assert!(all[0].get("route").is_none());

    let (_, runs) = send(&app, "GET", "/api/activities?kind=running", None).await;
    assert_eq!(runs.as_array().unwrap().len(), 2);

    let (_, one) = send(&app, "GET", "/api/activities?kind=running&limit=1", None).await;
    assert_eq!(one.as_array().unwrap().len(), 1);
    assert_eq!(one[0]["id"], latest.0);

    let (status, _) = send(&app, "GET", "/api/activities?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_and_delete_activity() {
    let (app, state, clock) = create_test_app();
    let id = record(&state, &clock, ActivityKind::Walking, 2).await;

    let (status, body) = send(&app, "GET", &format!("/api/activities/{}", id.0), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["route"].as_array().unwrap().len(), 3);
    assert_eq!(body["status"], "completed");

    let (status, body) = send(&app, "GET", "/api/activities/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    // Unknown ids are a no-op.
    let (status, _) = send(&app, "DELETE", "/api/activities/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.tracker.lock().await.history().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/activities/{}", id.0), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.tracker.lock().await.history().is_empty());
}

#[tokio::test]
async fn test_clear_history() {
    let (app, state, clock) = create_test_app();
    record(&state, &clock, ActivityKind::Running, 1).await;
    record(&state, &clock, ActivityKind::Cycling, 1).await;

    let (status, _) = send(&app, "DELETE", "/api/activities", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, total) = send(&app, "GET", "/api/stats/total", None).await;
    assert_eq!(total["total_activities"], 0);
}

#[tokio::test]
async fn test_gpx_download() {
    let (app, state, clock) = create_test_app();
    let id = record(&state, &clock, ActivityKind::Running, 3).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/activities/{}/gpx", id.0))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/gpx+xml"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap(),
        format!("attachment; filename=\"activity_{}.gpx\"", id.0)
    );
    assert_eq!(response.headers().get("X-Content-Type-Options").unwrap(), "nosniff");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let doc = gpx::read(bytes.as_ref()).unwrap();
    assert_eq!(doc.tracks.len(), 1);
    assert_eq!(doc.tracks[0].segments[0].points.len(), 4);
}

#[tokio::test]
async fn test_share_text() {
    let (app, state, clock) = create_test_app();
    let id = record(&state, &clock, ActivityKind::Walking, 2).await;

    let (status, body) = send(&app, "GET", &format!("/api/activities/{}/share", id.0), None).await;
    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("Distance: 222 m"), "{}", text);
    assert!(text.contains("Time: 2:00"), "{}", text);
    assert!(text.contains("#walking"), "{}", text);
}

#[tokio::test]
async fn test_settings_update_and_validation() {
    let (app, _, _) = create_test_app();

    let (status, settings) = send(&app, "GET", "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["weight_kg"], 70.0);

    let (status, settings) = send(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({"weight_kg": 82.5, "units": "imperial", "name": "Sam"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["weight_kg"], 82.5);
    assert_eq!(settings["units"], "imperial");
    assert_eq!(settings["name"], "Sam");
    assert_eq!(settings["theme"], "light");

    let (status, body) = send(&app, "PUT", "/api/settings", Some(json!({"weight_kg": 0.0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({"name": "x".repeat(101)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, settings) = send(&app, "GET", "/api/settings", None).await;
    assert_eq!(settings["weight_kg"], 82.5);
}

#[tokio::test]
async fn test_weight_change_applies_to_calories() {
    let (app, state, clock) = create_test_app();
    send(&app, "PUT", "/api/settings", Some(json!({"weight_kg": 140.0}))).await;
    let id = record(&state, &clock, ActivityKind::Running, 2).await;

    let tracker = state.tracker.lock().await;
    // 10 MET x 140 kg x (0.22239 km / 10 km/h)
    assert_eq!(tracker.history().get(id).unwrap().calories, 31);
}

#[tokio::test]
async fn test_planning_points_and_errors() {
    let (app, _, _) = create_test_app();

    let (status, plan) = send(
        &app,
        "PUT",
        "/api/plan/points",
        Some(json!({"points": [{"lat": 40.0, "lng": -3.0}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["selected_points"].as_array().unwrap().len(), 1);

    // One waypoint is not a route.
    let (status, _) = send(&app, "POST", "/api/plan/route", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(
        &app,
        "PUT",
        "/api/plan/points",
        Some(json!({"points": [{"lat": 40.0, "lng": -3.0}, {"lat": 40.01, "lng": -3.01}]})),
    )
    .await;

    // The test config points at a closed port.
    let (status, body) = send(
        &app,
        "POST",
        "/api/plan/route",
        Some(json!({"kind": "cycling"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "routing_error");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/plan/points",
        Some(json!({"points": [{"lat": 100.0, "lng": 0.0}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, plan) = send(&app, "DELETE", "/api/plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(plan["selected_points"].as_array().unwrap().is_empty());
    assert_eq!(plan["mode"], "free");
}
