// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tracking session service.
//!
//! Bundles the lifecycle engine with everything around it that the UI
//! addresses: the history, user settings, the last known location and the
//! map-planning state. One `Tracker` lives in `AppState` behind a mutex, so
//! samples, ticks and transitions are serialized.
//!
//! While an activity exists the tracker also owns its session tasks: a
//! subscription to the location feed that forwards fixes to the engine, and
//! a ticker that recomputes metrics between fixes. Both are cancelled on
//! stop.

use serde::Serialize;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;

use crate::db::PersistedState;
use crate::models::{
    Activity, ActivityId, ActivityKind, Coordinate, MapMode, PlanningState, SettingsUpdate,
    UserSettings,
};
use crate::services::engine::{ActivityEngine, LifecycleError, StopOutcome};
use crate::services::history::HistoryStore;
use crate::services::location::{LocationError, LocationEvent, Subscription};
use crate::time_utils::{Clock, LocalZone};
use crate::AppState;

/// Background tasks tied to the current activity.
#[derive(Debug)]
pub struct SessionTasks {
    samples: Subscription,
    ticker: Subscription,
}

impl SessionTasks {
    pub fn is_running(&self) -> bool {
        !self.samples.is_finished() && !self.ticker.is_finished()
    }

    /// Stop forwarding fixes and ticking.
    pub fn cancel(self) {
        self.samples.cancel();
        self.ticker.cancel();
    }
}

/// Snapshot of the live tracking state for the UI.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingView {
    pub is_tracking: bool,
    pub activity: Option<Activity>,
    pub user_location: Option<Coordinate>,
    pub location_error: Option<LocationError>,
    pub map_mode: MapMode,
}

pub struct Tracker {
    engine: ActivityEngine,
    history: HistoryStore,
    settings: UserSettings,
    planning: PlanningState,
    user_location: Option<Coordinate>,
    location_error: Option<LocationError>,
    session: Option<SessionTasks>,
}

impl Tracker {
    pub fn new(
        clock: Arc<dyn Clock>,
        saved: PersistedState,
        history_limit: Option<usize>,
        zone: impl Into<LocalZone>,
    ) -> Self {
        let history = HistoryStore::new(saved.activities, history_limit, zone);
        let engine = ActivityEngine::new(clock).with_last_id(history.max_id());
        Self {
            engine,
            history,
            settings: saved.settings,
            planning: PlanningState::default(),
            user_location: None,
            location_error: None,
            session: None,
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────

    /// Start an activity seeded with `seed`, or else the last known location.
    pub fn start(
        &mut self,
        kind: ActivityKind,
        seed: Option<Coordinate>,
    ) -> Result<Activity, LifecycleError> {
        let seed = seed.or(self.user_location);
        let activity = self.engine.start(kind, seed, &self.settings)?.clone();
        self.planning.mode = MapMode::Tracking;
        Ok(activity)
    }

    pub fn attach_session(&mut self, tasks: SessionTasks) {
        self.session = Some(tasks);
    }

    pub fn has_session(&self) -> bool {
        self.session.as_ref().is_some_and(SessionTasks::is_running)
    }

    pub fn pause(&mut self) -> Result<(), LifecycleError> {
        self.engine.pause()
    }

    pub fn resume(&mut self) -> Result<(), LifecycleError> {
        self.engine.resume()
    }

    /// Stop the activity, cancel its session tasks and reset planning.
    pub fn stop(&mut self) -> Result<StopOutcome, LifecycleError> {
        let outcome = self.engine.stop(&mut self.history)?;
        if let Some(tasks) = self.session.take() {
            tasks.cancel();
            tracing::debug!("Session tasks cancelled");
        }
        self.planning.mode = MapMode::Free;
        self.planning.clear_route();
        Ok(outcome)
    }

    pub fn add_sample(&mut self, coord: Coordinate) -> bool {
        self.engine.add_sample(coord, &self.settings)
    }

    pub fn tick(&mut self) -> bool {
        self.engine.tick(&self.settings)
    }

    pub fn is_tracking(&self) -> bool {
        self.engine.is_tracking()
    }

    pub fn current(&self) -> Option<&Activity> {
        self.engine.current()
    }

    // ─── Location ────────────────────────────────────────────────

    /// Remember what the location source reported, for seeding and display.
    pub fn record_location(&mut self, event: &LocationEvent) {
        match event {
            LocationEvent::Fix(coord) => {
                self.user_location = Some(*coord);
                self.location_error = None;
            }
            LocationEvent::Error { error } => {
                tracing::warn!(error = %error, tracking = self.is_tracking(), "Location source failed");
                self.location_error = Some(*error);
            }
        }
    }

    pub fn view(&self) -> TrackingView {
        TrackingView {
            is_tracking: self.is_tracking(),
            activity: self.engine.current().cloned(),
            user_location: self.user_location,
            location_error: self.location_error,
            map_mode: self.planning.mode,
        }
    }

    // ─── History & settings ──────────────────────────────────────

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn remove_activity(&mut self, id: ActivityId) -> bool {
        self.history.remove(id)
    }

    pub fn clear_history(&mut self) {
        self.history.clear_all();
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) -> &UserSettings {
        self.settings.apply(update);
        &self.settings
    }

    /// What gets persisted: settings and history, never the current activity.
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            settings: self.settings.clone(),
            activities: self.history.activities().to_vec(),
        }
    }

    // ─── Planning ────────────────────────────────────────────────

    pub fn planning(&self) -> &PlanningState {
        &self.planning
    }

    pub fn set_selected_points(&mut self, points: Vec<Coordinate>) {
        self.planning.selected_points = points;
    }

    pub fn set_planned_route(&mut self, route: Vec<Coordinate>) {
        self.planning.planned_route = route;
    }

    pub fn clear_route(&mut self) {
        self.planning.clear_route();
    }
}

/// Spawn the sample forwarder and ticker for a freshly started activity.
///
/// Call while holding the tracker lock right after `start`, so no fix
/// published after the start response can be missed.
pub fn spawn_session(state: &Arc<AppState>) -> SessionTasks {
    let feed_state = state.clone();
    let samples = state.location_feed.subscribe(move |event| {
        let state = feed_state.clone();
        async move {
            if let LocationEvent::Fix(coord) = event {
                state.tracker.lock().await.add_sample(coord);
            }
        }
    });

    let tick_state = state.clone();
    let ticker = Subscription::new(tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_state.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            tick_state.tracker.lock().await.tick();
        }
    }));

    SessionTasks { samples, ticker }
}
