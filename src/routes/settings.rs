// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::error::{AppError, Result};
use crate::models::{SettingsUpdate, UserSettings};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/settings", get(get_settings).put(update_settings))
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<UserSettings> {
    Json(state.tracker.lock().await.settings().clone())
}

/// Merge a partial update into the settings and persist.
///
/// A new weight applies to the next calorie recompute, including that of
/// an activity already in progress.
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<UserSettings>> {
    update
        .validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid settings: {}", e)))?;

    let settings = state.tracker.lock().await.update_settings(update).clone();
    tracing::info!(
        weight_kg = settings.weight_kg,
        units = ?settings.units,
        "Settings updated"
    );
    state.persist().await?;

    Ok(Json(settings))
}
