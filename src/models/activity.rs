// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tracked activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True if both components are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

// geo uses x = longitude, y = latitude.
impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.lng, c.lat)
    }
}

impl From<geo::Coord<f64>> for Coordinate {
    fn from(c: geo::Coord<f64>) -> Self {
        Self { lat: c.y, lng: c.x }
    }
}

/// Kind of exercise being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Running,
    Cycling,
    Walking,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 3] = [
        ActivityKind::Running,
        ActivityKind::Cycling,
        ActivityKind::Walking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Running => "running",
            ActivityKind::Cycling => "cycling",
            ActivityKind::Walking => "walking",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status. "Idle" is the absence of a current activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Active,
    Paused,
    Completed,
}

/// Opaque, monotonically assigned activity identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub u64);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "activity_{}", self.0)
    }
}

/// One tracked exercise session.
///
/// The derived fields (`distance_meters` through `max_speed_kmh`) are a cache
/// recomputed by the lifecycle engine from the route and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub kind: ActivityKind,
    pub status: ActivityStatus,
    pub start_time: DateTime<Utc>,
    /// Set once, on completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Total time spent paused (milliseconds)
    #[serde(default)]
    pub paused_ms: i64,
    /// Sampled coordinates, append-only
    pub route: Vec<Coordinate>,
    /// Distance in meters
    pub distance_meters: f64,
    /// Active (non-paused) duration in seconds
    pub duration_seconds: f64,
    /// Estimated energy in kcal
    pub calories: u32,
    /// km/h
    pub avg_speed_kmh: f64,
    /// km/h
    pub max_speed_kmh: f64,
}

impl Activity {
    pub(crate) fn begin(
        id: ActivityId,
        kind: ActivityKind,
        start_time: DateTime<Utc>,
        seed: Option<Coordinate>,
    ) -> Self {
        Self {
            id,
            kind,
            status: ActivityStatus::Active,
            start_time,
            end_time: None,
            paused_ms: 0,
            route: seed.into_iter().collect(),
            distance_meters: 0.0,
            duration_seconds: 0.0,
            calories: 0,
            avg_speed_kmh: 0.0,
            max_speed_kmh: 0.0,
        }
    }
}
