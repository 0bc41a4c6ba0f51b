// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregate statistics over completed activities.
//!
//! None of these are stored. They are folded from the history on every
//! query, so they cannot drift from it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Activity, ActivityKind};

/// Totals for one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Serialized as "YYYY-MM-DD"
    pub date: NaiveDate,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub calories: u32,
    pub activities: u32,
}

impl DailyStats {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            distance_meters: 0.0,
            duration_seconds: 0.0,
            calories: 0,
            activities: 0,
        }
    }

    pub fn add(&mut self, activity: &Activity) {
        self.distance_meters += activity.distance_meters;
        self.duration_seconds += activity.duration_seconds;
        self.calories += activity.calories;
        self.activities += 1;
    }
}

/// All-time totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalStats {
    pub total_distance_meters: f64,
    pub total_duration_seconds: f64,
    pub total_calories: u32,
    pub total_activities: u32,
}

/// Overview used by the statistics card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    // ─── Totals ──────────────────────────────────────────────────
    #[serde(flatten)]
    pub totals: TotalStats,
    /// Overall average speed (km/h) across all active time
    pub average_speed_kmh: f64,

    // ─── Records ─────────────────────────────────────────────────
    /// Longest single activity (meters)
    pub longest_distance_meters: f64,
    /// Longest single activity (seconds)
    pub longest_duration_seconds: f64,

    // ─── By Kind ─────────────────────────────────────────────────
    pub activities_by_kind: BTreeMap<ActivityKind, u32>,
}

impl ActivityStats {
    /// Fold one completed activity into the overview.
    pub fn update_from_activity(&mut self, activity: &Activity) {
        self.totals.total_activities += 1;
        self.totals.total_distance_meters += activity.distance_meters;
        self.totals.total_duration_seconds += activity.duration_seconds;
        self.totals.total_calories += activity.calories;

        self.longest_distance_meters = self.longest_distance_meters.max(activity.distance_meters);
        self.longest_duration_seconds = self
            .longest_duration_seconds
            .max(activity.duration_seconds);

        *self.activities_by_kind.entry(activity.kind).or_insert(0) += 1;

        self.average_speed_kmh = crate::services::metrics::average_speed_kmh(
            self.totals.total_distance_meters,
            self.totals.total_duration_seconds,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityId, ActivityStatus};
    use chrono::{TimeZone, Utc};

    fn make_activity(id: u64, kind: ActivityKind, distance: f64, duration: f64) -> Activity {
        Activity {
            id: ActivityId(id),
            kind,
            status: ActivityStatus::Completed,
            start_time: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            end_time: Some(Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap()),
            paused_ms: 0,
            route: vec![],
            distance_meters: distance,
            duration_seconds: duration,
            calories: 100,
            avg_speed_kmh: 0.0,
            max_speed_kmh: 0.0,
        }
    }

    #[test]
    fn test_update_from_activity_basic() {
        let mut stats = ActivityStats::default();
        stats.update_from_activity(&make_activity(1, ActivityKind::Running, 10_000.0, 3600.0));

        assert_eq!(stats.totals.total_activities, 1);
        assert_eq!(stats.totals.total_distance_meters, 10_000.0);
        assert_eq!(stats.totals.total_calories, 100);
        assert_eq!(stats.average_speed_kmh, 10.0);
        assert_eq!(stats.activities_by_kind.get(&ActivityKind::Running), Some(&1));
    }

    #[test]
    fn test_longest_tracks_maximum_per_field() {
        let mut stats = ActivityStats::default();
        stats.update_from_activity(&make_activity(1, ActivityKind::Cycling, 30_000.0, 3600.0));
        stats.update_from_activity(&make_activity(2, ActivityKind::Walking, 4_000.0, 5400.0));

        assert_eq!(stats.longest_distance_meters, 30_000.0);
        assert_eq!(stats.longest_duration_seconds, 5400.0);
        assert_eq!(stats.activities_by_kind.get(&ActivityKind::Cycling), Some(&1));
        assert_eq!(stats.activities_by_kind.get(&ActivityKind::Walking), Some(&1));
        assert_eq!(stats.activities_by_kind.get(&ActivityKind::Running), None);
    }

    #[test]
    fn test_daily_stats_serializes_plain_date() {
        let day = DailyStats::empty(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["date"], "2024-03-09");
    }
}
