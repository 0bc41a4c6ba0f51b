// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod engine;
pub mod export;
pub mod geodesy;
pub mod history;
pub mod location;
pub mod metrics;
pub mod routing;
pub mod tracker;

pub use engine::{ActivityEngine, LifecycleError, StopOutcome};
pub use history::HistoryStore;
pub use location::{LocationError, LocationEvent, LocationFeed, Subscription};
pub use routing::{RoutingError, RoutingService};
pub use tracker::{spawn_session, Tracker, TrackingView};
