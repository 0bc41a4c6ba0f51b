// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completed-activity history and on-demand aggregates.
//!
//! The history is the single source of truth: every statistic is folded
//! from it at query time, so there is nothing to invalidate.

use chrono::{Days, NaiveDate};

use crate::models::{
    Activity, ActivityId, ActivityKind, ActivityStats, ActivityStatus, DailyStats, TotalStats,
};
use crate::time_utils::LocalZone;

/// Ordered history, most recent first.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    activities: Vec<Activity>,
    /// Keep at most this many activities; `None` is unbounded
    limit: Option<usize>,
    /// Zone for calendar-date grouping
    zone: LocalZone,
}

impl HistoryStore {
    pub fn new(
        activities: Vec<Activity>,
        limit: Option<usize>,
        zone: impl Into<LocalZone>,
    ) -> Self {
        let mut store = Self {
            activities,
            limit,
            zone: zone.into(),
        };
        store.prune();
        store
    }

    /// Insert at the head. No dedup; the oldest entries past the limit go.
    pub fn append(&mut self, activity: Activity) {
        self.activities.insert(0, activity);
        self.prune();
    }

    /// Delete by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: ActivityId) -> bool {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != id);
        before != self.activities.len()
    }

    pub fn clear_all(&mut self) {
        self.activities.clear();
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn get(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Highest id ever stored, so new ids can stay above it.
    pub fn max_id(&self) -> Option<ActivityId> {
        self.activities.iter().map(|a| a.id).max()
    }

    /// Most-recent-first listing with optional kind filter and limit.
    pub fn list(&self, kind: Option<ActivityKind>, limit: Option<usize>) -> Vec<Activity> {
        self.completed()
            .filter(|a| kind.is_none_or(|k| a.kind == k))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Local calendar date an activity belongs to (from its start time).
    pub fn date_of(&self, activity: &Activity) -> NaiveDate {
        self.zone.date_of(activity.start_time)
    }

    pub fn stats_for_day(&self, date: NaiveDate) -> DailyStats {
        let mut day = DailyStats::empty(date);
        for activity in self.completed().filter(|a| self.date_of(a) == date) {
            day.add(activity);
        }
        day
    }

    /// One entry per day for the `days` days ending at `today`, oldest first.
    pub fn stats_for_range(&self, today: NaiveDate, days: u32) -> Vec<DailyStats> {
        (0..days)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
            .map(|date| self.stats_for_day(date))
            .collect()
    }

    pub fn total_stats(&self) -> TotalStats {
        self.overview().totals
    }

    pub fn overview(&self) -> ActivityStats {
        let mut stats = ActivityStats::default();
        for activity in self.completed() {
            stats.update_from_activity(activity);
        }
        stats
    }

    fn completed(&self) -> impl Iterator<Item = &Activity> {
        self.activities
            .iter()
            .filter(|a| a.status == ActivityStatus::Completed)
    }

    fn prune(&mut self) {
        if let Some(limit) = self.limit {
            if self.activities.len() > limit {
                tracing::debug!(
                    dropped = self.activities.len() - limit,
                    limit,
                    "Pruning oldest activities"
                );
                self.activities.truncate(limit);
            }
        }
    }
}
