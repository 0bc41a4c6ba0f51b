// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Routes driving the current activity and the location feed.

use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityKind, Coordinate};
use crate::routes::validate_coordinate;
use crate::services::{spawn_session, LocationEvent, StopOutcome, TrackingView};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activity", get(get_current))
        .route("/api/activity/start", post(start_activity))
        .route("/api/activity/pause", post(pause_activity))
        .route("/api/activity/resume", post(resume_activity))
        .route("/api/activity/stop", post(stop_activity))
        .route("/api/location", post(report_location))
}

/// Current activity, tracking flag and location status.
async fn get_current(State(state): State<Arc<AppState>>) -> Json<TrackingView> {
    Json(state.tracker.lock().await.view())
}

#[derive(Deserialize)]
struct StartRequest {
    kind: ActivityKind,
    /// Defaults to the last reported location
    seed: Option<Coordinate>,
}

async fn start_activity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRequest>,
) -> Result<(StatusCode, Json<Activity>)> {
    if let Some(seed) = &req.seed {
        validate_coordinate(seed)?;
    }

    let mut tracker = state.tracker.lock().await;
    let activity = tracker.start(req.kind, req.seed)?;
    // Subscribe before releasing the lock so no fix is missed.
    tracker.attach_session(spawn_session(&state));

    Ok((StatusCode::CREATED, Json(activity)))
}

async fn pause_activity(State(state): State<Arc<AppState>>) -> Result<Json<TrackingView>> {
    let mut tracker = state.tracker.lock().await;
    tracker.pause()?;
    Ok(Json(tracker.view()))
}

async fn resume_activity(State(state): State<Arc<AppState>>) -> Result<Json<TrackingView>> {
    let mut tracker = state.tracker.lock().await;
    tracker.resume()?;
    Ok(Json(tracker.view()))
}

#[derive(Serialize)]
pub struct StopResponse {
    /// "completed" or "cancelled"
    pub outcome: &'static str,
    pub activity: Option<Activity>,
    /// False when the completed activity could not be written to disk;
    /// it is still in memory and is retried with the next save.
    pub saved: bool,
}

async fn stop_activity(State(state): State<Arc<AppState>>) -> Result<Json<StopResponse>> {
    let (outcome, completed) = {
        let mut tracker = state.tracker.lock().await;
        let outcome = tracker.stop()?;
        let completed = match outcome {
            StopOutcome::Completed(id) => {
                let activity = tracker.history().get(id).cloned().ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!("Completed activity {} missing from history", id))
                })?;
                Some(activity)
            }
            StopOutcome::Cancelled => None,
        };
        (outcome, completed)
    };

    let response = match outcome {
        StopOutcome::Completed(_) => {
            let saved = match state.persist().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to save completed activity");
                    false
                }
            };
            StopResponse {
                outcome: "completed",
                activity: completed,
                saved,
            }
        }
        StopOutcome::Cancelled => StopResponse {
            outcome: "cancelled",
            activity: None,
            saved: true,
        },
    };

    Ok(Json(response))
}

/// Accept a fix or a failure from the device's location source.
///
/// Failures leave the activity running; it just stops receiving samples.
async fn report_location(
    State(state): State<Arc<AppState>>,
    Json(event): Json<LocationEvent>,
) -> Result<StatusCode> {
    if let LocationEvent::Fix(coord) = &event {
        validate_coordinate(coord)?;
    }

    state.tracker.lock().await.record_location(&event);
    let delivered = state.location_feed.publish(event);
    tracing::debug!(delivered, "Location event published");

    Ok(StatusCode::ACCEPTED)
}
