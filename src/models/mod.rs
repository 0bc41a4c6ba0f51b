// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod planning;
pub mod settings;
pub mod stats;

pub use activity::{Activity, ActivityId, ActivityKind, ActivityStatus, Coordinate};
pub use planning::{MapMode, PlanningState};
pub use settings::{SettingsUpdate, UserSettings};
pub use stats::{ActivityStats, DailyStats, TotalStats};
