// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived metrics (calories, speed, pace) and their display formatting.

use crate::models::ActivityKind;

impl ActivityKind {
    /// Metabolic equivalent of task.
    pub fn met(&self) -> f64 {
        match self {
            ActivityKind::Running => 10.0,
            ActivityKind::Cycling => 8.0,
            ActivityKind::Walking => 3.5,
        }
    }

    /// Assumed average speed (km/h) used to turn distance into effort time.
    pub fn assumed_speed_kmh(&self) -> f64 {
        match self {
            ActivityKind::Running => 10.0,
            ActivityKind::Cycling => 20.0,
            ActivityKind::Walking => 5.0,
        }
    }
}

/// Estimated energy expenditure in kcal, rounded to the nearest integer.
///
/// Depends only on distance, kind and weight: the duration is implied from
/// the kind's assumed speed, not taken from the clock.
pub fn calories(distance_meters: f64, kind: ActivityKind, weight_kg: f64) -> u32 {
    let distance_km = distance_meters.max(0.0) / 1000.0;
    let hours = distance_km / kind.assumed_speed_kmh();
    let kcal = kind.met() * weight_kg.max(0.0) * hours;

    if kcal.is_finite() {
        kcal.round() as u32
    } else {
        0
    }
}

/// Average speed in km/h; 0 when no time has elapsed.
pub fn average_speed_kmh(distance_meters: f64, duration_seconds: f64) -> f64 {
    if duration_seconds <= 0.0 {
        return 0.0;
    }
    (distance_meters / 1000.0) / (duration_seconds / 3600.0)
}

/// Pace in minutes per km; `None` when no distance has been covered.
pub fn pace_min_per_km(distance_meters: f64, duration_seconds: f64) -> Option<f64> {
    if distance_meters <= 0.0 {
        return None;
    }
    Some((duration_seconds / 60.0) / (distance_meters / 1000.0))
}

/// "H:MM:SS" from one hour up, "M:SS" below.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// "X.XX km" from 1 km up, "N m" below.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round() as i64)
    }
}

pub fn format_speed(kmh: f64) -> String {
    format!("{:.1} km/h", kmh)
}

/// "M:SS min/km", or "-" when pace is undefined.
pub fn format_pace(min_per_km: Option<f64>) -> String {
    let Some(pace) = min_per_km.filter(|p| p.is_finite() && *p >= 0.0) else {
        return "-".to_string();
    };

    let mut minutes = pace.floor() as u64;
    let mut seconds = ((pace - pace.floor()) * 60.0).round() as u64;
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }
    format!("{}:{:02} min/km", minutes, seconds)
}
