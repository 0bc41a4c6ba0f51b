// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity lifecycle engine.
//!
//! Owns the single current-activity slot and drives it through
//! `Active -> Paused -> Active -> ... -> Completed` (or back to no activity
//! when cancelled). Every sample and every tick funnels through one
//! derive-metrics routine, so the cached fields on the activity are always
//! a function of route, timestamps, kind and weight.
//!
//! Timing is pause-aware: the moment a pause begins is remembered, and the
//! interval is folded into `paused_ms` on resume (or on stop while paused).
//! While the pause is still open it is subtracted on the fly, so elapsed
//! active time never moves during a pause and never goes negative.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::models::{Activity, ActivityId, ActivityKind, ActivityStatus, Coordinate, UserSettings};
use crate::services::geodesy::haversine;
use crate::services::history::HistoryStore;
use crate::services::metrics;
use crate::time_utils::Clock;

/// Operation not allowed in the current lifecycle state.
///
/// Always recoverable: callers can check `is_tracking()` first, or treat
/// the error as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("An activity is already in progress")]
    AlreadyActive,

    #[error("No activity in progress")]
    NoActivity,

    #[error("Activity is not active")]
    NotActive,

    #[error("Activity is not paused")]
    NotPaused,
}

/// Result of stopping the current activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Route had more than one point; moved into history.
    Completed(ActivityId),
    /// Route had one point or none; discarded.
    Cancelled,
}

/// The current activity plus the bookkeeping that never leaves the engine.
struct Tracked {
    activity: Activity,
    /// Set while paused
    paused_at: Option<DateTime<Utc>>,
    /// Weight used for the last calorie estimate
    weight_kg: f64,
}

pub struct ActivityEngine {
    clock: Arc<dyn Clock>,
    current: Option<Tracked>,
    last_id: u64,
}

impl ActivityEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            current: None,
            last_id: 0,
        }
    }

    /// Never hand out an id at or below `last`. Used after loading history.
    pub fn with_last_id(mut self, last: Option<ActivityId>) -> Self {
        if let Some(ActivityId(id)) = last {
            self.last_id = self.last_id.max(id);
        }
        self
    }

    pub fn current(&self) -> Option<&Activity> {
        self.current.as_ref().map(|t| &t.activity)
    }

    pub fn is_tracking(&self) -> bool {
        self.current.is_some()
    }

    pub fn status(&self) -> Option<ActivityStatus> {
        self.current.as_ref().map(|t| t.activity.status)
    }

    /// Begin a new activity, optionally seeded with the user's location.
    pub fn start(
        &mut self,
        kind: ActivityKind,
        seed: Option<Coordinate>,
        settings: &UserSettings,
    ) -> Result<&Activity, LifecycleError> {
        if self.current.is_some() {
            return Err(LifecycleError::AlreadyActive);
        }

        let now = self.clock.now();
        let id = self.next_id(now);
        let seed = seed.filter(Coordinate::is_valid);
        let activity = Activity::begin(id, kind, now, seed);

        tracing::info!(activity_id = %id, %kind, seeded = seed.is_some(), "Activity started");

        let tracked = self.current.insert(Tracked {
            activity,
            paused_at: None,
            weight_kg: settings.weight_kg,
        });
        Ok(&tracked.activity)
    }

    pub fn pause(&mut self) -> Result<(), LifecycleError> {
        let now = self.clock.now();
        let tracked = self.current.as_mut().ok_or(LifecycleError::NoActivity)?;
        if tracked.activity.status != ActivityStatus::Active {
            return Err(LifecycleError::NotActive);
        }

        tracked.activity.status = ActivityStatus::Paused;
        tracked.paused_at = Some(now);

        tracing::info!(activity_id = %tracked.activity.id, "Activity paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), LifecycleError> {
        let now = self.clock.now();
        let tracked = self.current.as_mut().ok_or(LifecycleError::NoActivity)?;
        if tracked.activity.status != ActivityStatus::Paused {
            return Err(LifecycleError::NotPaused);
        }

        let paused_for = close_pause(tracked, now);
        tracked.activity.status = ActivityStatus::Active;
        derive_metrics(tracked, now);

        tracing::info!(
            activity_id = %tracked.activity.id,
            paused_ms = paused_for,
            total_paused_ms = tracked.activity.paused_ms,
            "Activity resumed"
        );
        Ok(())
    }

    /// Append a location sample to the route.
    ///
    /// Returns `false` (and changes nothing) unless an activity is active
    /// and the coordinate is valid. Location sources keep emitting while
    /// paused, so rejection is routine, not an error.
    pub fn add_sample(&mut self, coord: Coordinate, settings: &UserSettings) -> bool {
        let now = self.clock.now();
        let Some(tracked) = self.current.as_mut() else {
            tracing::debug!("Sample ignored: no activity");
            return false;
        };
        if tracked.activity.status != ActivityStatus::Active {
            tracing::debug!(activity_id = %tracked.activity.id, "Sample ignored: not active");
            return false;
        }
        if !coord.is_valid() {
            tracing::debug!(lat = coord.lat, lng = coord.lng, "Sample ignored: invalid coordinate");
            return false;
        }

        let activity = &mut tracked.activity;
        if let Some(last) = activity.route.last() {
            activity.distance_meters += haversine(*last, coord);
        }
        activity.route.push(coord);
        tracked.weight_kg = settings.weight_kg;
        derive_metrics(tracked, now);
        true
    }

    /// Timer-driven recompute between samples. No-op unless active.
    pub fn tick(&mut self, settings: &UserSettings) -> bool {
        let now = self.clock.now();
        match self.current.as_mut() {
            Some(tracked) if tracked.activity.status == ActivityStatus::Active => {
                tracked.weight_kg = settings.weight_kg;
                derive_metrics(tracked, now);
                true
            }
            _ => false,
        }
    }

    /// Finish the current activity.
    ///
    /// Activities with more than one route point are completed and appended
    /// to `history`; anything shorter is discarded. The slot is cleared on
    /// both paths.
    pub fn stop(&mut self, history: &mut HistoryStore) -> Result<StopOutcome, LifecycleError> {
        let now = self.clock.now();
        let mut tracked = self.current.take().ok_or(LifecycleError::NoActivity)?;

        if tracked.paused_at.is_some() {
            close_pause(&mut tracked, now);
        }

        if tracked.activity.route.len() <= 1 {
            tracing::info!(
                activity_id = %tracked.activity.id,
                points = tracked.activity.route.len(),
                "Activity cancelled"
            );
            return Ok(StopOutcome::Cancelled);
        }

        derive_metrics(&mut tracked, now);
        let mut activity = tracked.activity;
        activity.status = ActivityStatus::Completed;
        activity.end_time = Some(now);

        let id = activity.id;
        tracing::info!(
            activity_id = %id,
            kind = %activity.kind,
            points = activity.route.len(),
            distance_meters = activity.distance_meters,
            duration_seconds = activity.duration_seconds,
            "Activity completed"
        );

        history.append(activity);
        Ok(StopOutcome::Completed(id))
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> ActivityId {
        let candidate = now.timestamp_millis().max(0) as u64;
        self.last_id = candidate.max(self.last_id + 1);
        ActivityId(self.last_id)
    }
}

/// Fold the open pause interval into `paused_ms`. Returns its length.
fn close_pause(tracked: &mut Tracked, now: DateTime<Utc>) -> i64 {
    let Some(began) = tracked.paused_at.take() else {
        return 0;
    };
    let paused_for = (now - began).num_milliseconds().max(0);
    tracked.activity.paused_ms += paused_for;
    paused_for
}

/// Active seconds at `now`, excluding closed pauses and any open one.
fn elapsed_seconds(tracked: &Tracked, now: DateTime<Utc>) -> f64 {
    let activity = &tracked.activity;
    let open_pause = tracked
        .paused_at
        .map(|began| (now - began).num_milliseconds().max(0))
        .unwrap_or(0);
    let active_ms = (now - activity.start_time).num_milliseconds() - activity.paused_ms - open_pause;
    active_ms.max(0) as f64 / 1000.0
}

/// Recompute every derived field. Shared by samples, ticks, resume and stop.
///
/// `max_speed_kmh` is the highest average speed seen by any recompute during
/// the activity, not an instantaneous speed between samples.
fn derive_metrics(tracked: &mut Tracked, now: DateTime<Utc>) {
    let duration = elapsed_seconds(tracked, now);
    let activity = &mut tracked.activity;

    activity.duration_seconds = duration;
    activity.avg_speed_kmh = metrics::average_speed_kmh(activity.distance_meters, duration);
    activity.calories = metrics::calories(activity.distance_meters, activity.kind, tracked.weight_kg);
    activity.max_speed_kmh = activity.max_speed_kmh.max(activity.avg_speed_kmh);
}
