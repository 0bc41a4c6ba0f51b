// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Stride Tracker: record runs, rides and walks.
//!
//! This crate provides the backend for a browser activity tracker: the
//! single-activity lifecycle engine, derived metrics, history and
//! statistics, GPX export and route planning.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;

use config::Config;
use db::{JsonStore, PersistedState, StoreError};
use services::{LocationFeed, RoutingService, Tracker};
use time_utils::{Clock, LocalZone};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    /// Zone for calendar-day statistics
    pub zone: LocalZone,
    pub tracker: Mutex<Tracker>,
    pub store: JsonStore,
    pub location_feed: LocationFeed,
    pub routing_service: RoutingService,
    /// Serializes snapshot-and-write so saves land in order
    save_lock: Mutex<()>,
}

impl AppState {
    pub fn new(
        config: Config,
        clock: Arc<dyn Clock>,
        zone: impl Into<LocalZone>,
        store: JsonStore,
        saved: PersistedState,
    ) -> Self {
        let zone = zone.into();
        let tracker = Tracker::new(clock.clone(), saved, config.history_limit, zone);
        let routing_service = RoutingService::new(config.osrm_base_url.clone());
        Self {
            config,
            clock,
            zone,
            tracker: Mutex::new(tracker),
            store,
            location_feed: LocationFeed::new(),
            routing_service,
            save_lock: Mutex::new(()),
        }
    }

    /// Today's date in the user's zone.
    pub fn today(&self) -> NaiveDate {
        self.zone.date_of(self.clock.now())
    }

    /// Write the current settings and history to the store.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let _guard = self.save_lock.lock().await;
        let snapshot = self.tracker.lock().await.snapshot();
        self.store.save(&snapshot).await
    }
}
