// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map route-planning routes.

use crate::error::{AppError, Result};
use crate::models::{ActivityKind, Coordinate, PlanningState};
use crate::routes::validate_coordinate;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const MAX_WAYPOINTS: usize = 25;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/plan", get(get_plan).delete(clear_plan))
        .route("/api/plan/points", put(set_points))
        .route("/api/plan/route", post(plan_route))
}

async fn get_plan(State(state): State<Arc<AppState>>) -> Json<PlanningState> {
    Json(state.tracker.lock().await.planning().clone())
}

#[derive(Deserialize)]
struct PointsRequest {
    points: Vec<Coordinate>,
}

/// Replace the selected waypoints. Any previously planned route is stale.
async fn set_points(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PointsRequest>,
) -> Result<Json<PlanningState>> {
    if req.points.len() > MAX_WAYPOINTS {
        return Err(AppError::BadRequest(format!(
            "At most {} waypoints are allowed",
            MAX_WAYPOINTS
        )));
    }
    for point in &req.points {
        validate_coordinate(point)?;
    }

    let mut tracker = state.tracker.lock().await;
    tracker.set_planned_route(Vec::new());
    tracker.set_selected_points(req.points);
    Ok(Json(tracker.planning().clone()))
}

#[derive(Deserialize)]
struct RouteRequest {
    kind: Option<ActivityKind>,
}

/// Ask the routing service for a route through the selected waypoints.
async fn plan_route(
    State(state): State<Arc<AppState>>,
    body: Option<Json<RouteRequest>>,
) -> Result<Json<PlanningState>> {
    let kind = body
        .and_then(|Json(req)| req.kind)
        .unwrap_or(ActivityKind::Walking);

    let points = state.tracker.lock().await.planning().selected_points.clone();

    // Tracker stays unlocked while waiting on the network.
    let route = match points.as_slice() {
        [start, end] => state.routing_service.fetch_route(*start, *end, kind).await?,
        _ => {
            state
                .routing_service
                .fetch_multi_point_route(&points, kind)
                .await?
        }
    };

    tracing::info!(
        waypoints = points.len(),
        route_points = route.len(),
        kind = %kind,
        "Route planned"
    );

    let mut tracker = state.tracker.lock().await;
    // Points may have changed while the request was in flight.
    if tracker.planning().selected_points != points {
        return Err(AppError::BadRequest(
            "Waypoints changed while planning".to_string(),
        ));
    }
    tracker.set_planned_route(route);
    Ok(Json(tracker.planning().clone()))
}

async fn clear_plan(State(state): State<Arc<AppState>>) -> Json<PlanningState> {
    let mut tracker = state.tracker.lock().await;
    tracker.clear_route();
    Json(tracker.planning().clone())
}
