// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Routes for the activity history, exports and statistics.

use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityId, ActivityKind, ActivityStats, DailyStats, TotalStats,
};
use crate::services::export;
use crate::services::metrics::{format_distance, format_duration, format_pace, pace_min_per_km};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_LIST_LIMIT: usize = 500;
const DEFAULT_RANGE_DAYS: u32 = 7;
const MAX_RANGE_DAYS: u32 = 366;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).delete(clear_activities))
        .route(
            "/api/activities/{id}",
            get(get_activity).delete(delete_activity),
        )
        .route("/api/activities/{id}/gpx", get(download_gpx))
        .route("/api/activities/{id}/share", get(share_activity))
        .route("/api/stats/today", get(stats_today))
        .route("/api/stats/day/{date}", get(stats_for_day))
        .route("/api/stats/week", get(stats_for_range))
        .route("/api/stats/total", get(total_stats))
        .route("/api/stats/overview", get(stats_overview))
}

// ─── History ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListQuery {
    kind: Option<ActivityKind>,
    limit: Option<usize>,
}

/// History entry without the route, plus display strings.
#[derive(Serialize, Clone, Debug)]
pub struct ActivitySummary {
    pub id: ActivityId,
    pub kind: ActivityKind,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub points: usize,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub calories: u32,
    pub avg_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub distance_label: String,
    pub duration_label: String,
    pub pace_label: String,
}

impl From<&Activity> for ActivitySummary {
    fn from(a: &Activity) -> Self {
        Self {
            id: a.id,
            kind: a.kind,
            start_time: a.start_time,
            end_time: a.end_time,
            points: a.route.len(),
            distance_meters: a.distance_meters,
            duration_seconds: a.duration_seconds,
            calories: a.calories,
            avg_speed_kmh: a.avg_speed_kmh,
            max_speed_kmh: a.max_speed_kmh,
            distance_label: format_distance(a.distance_meters),
            duration_label: format_duration(a.duration_seconds),
            pace_label: format_pace(pace_min_per_km(a.distance_meters, a.duration_seconds)),
        }
    }
}

async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<ActivitySummary>>> {
    if params.limit == Some(0) {
        return Err(AppError::BadRequest("'limit' must be greater than 0".to_string()));
    }
    let limit = params.limit.map(|l| l.min(MAX_LIST_LIMIT));

    let tracker = state.tracker.lock().await;
    let summaries = tracker
        .history()
        .list(params.kind, limit)
        .iter()
        .map(ActivitySummary::from)
        .collect();
    Ok(Json(summaries))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Activity>> {
    Ok(Json(find_activity(&state, ActivityId(id)).await?))
}

/// Remove one activity. Unknown ids are a no-op.
async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    let removed = state.tracker.lock().await.remove_activity(ActivityId(id));
    if removed {
        tracing::info!(activity_id = %ActivityId(id), "Activity deleted");
        state.persist().await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_activities(State(state): State<Arc<AppState>>) -> Result<StatusCode> {
    state.tracker.lock().await.clear_history();
    tracing::info!("History cleared");
    state.persist().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_activity(state: &AppState, id: ActivityId) -> Result<Activity> {
    state
        .tracker
        .lock()
        .await
        .history()
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))
}

// ─── Export ──────────────────────────────────────────────────

async fn download_gpx(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse> {
    let activity = find_activity(&state, ActivityId(id)).await?;
    let xml = export::to_gpx_string(&activity)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::gpx_file_name(&activity)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/gpx+xml".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        xml,
    ))
}

#[derive(Serialize)]
pub struct ShareResponse {
    pub text: String,
}

async fn share_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ShareResponse>> {
    let activity = find_activity(&state, ActivityId(id)).await?;
    Ok(Json(ShareResponse {
        text: export::share_text(&activity),
    }))
}

// ─── Statistics ──────────────────────────────────────────────

async fn stats_today(State(state): State<Arc<AppState>>) -> Json<DailyStats> {
    let today = state.today();
    Json(state.tracker.lock().await.history().stats_for_day(today))
}

async fn stats_for_day(
    State(state): State<Arc<AppState>>,
    Path(date): Path<NaiveDate>,
) -> Json<DailyStats> {
    Json(state.tracker.lock().await.history().stats_for_day(date))
}

#[derive(Deserialize)]
struct RangeQuery {
    #[serde(default = "default_range_days")]
    days: u32,
}

fn default_range_days() -> u32 {
    DEFAULT_RANGE_DAYS
}

async fn stats_for_range(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Vec<DailyStats>>> {
    if params.days == 0 || params.days > MAX_RANGE_DAYS {
        return Err(AppError::BadRequest(format!(
            "'days' must be between 1 and {}",
            MAX_RANGE_DAYS
        )));
    }

    let today = state.today();
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.history().stats_for_range(today, params.days)))
}

async fn total_stats(State(state): State<Arc<AppState>>) -> Json<TotalStats> {
    Json(state.tracker.lock().await.history().total_stats())
}

async fn stats_overview(State(state): State<Arc<AppState>>) -> Json<ActivityStats> {
    Json(state.tracker.lock().await.history().overview())
}
