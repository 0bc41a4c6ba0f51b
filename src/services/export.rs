// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export of completed activities: GPX documents and share summaries.

use geo::{BoundingRect, LineString};
use gpx::{Gpx, GpxVersion, Metadata, Track, TrackSegment, Waypoint};
use time::OffsetDateTime;

use crate::models::{Activity, ActivityKind};
use crate::services::metrics::{format_distance, format_duration, format_pace, pace_min_per_km};
use crate::time_utils::format_utc_rfc3339;

const GPX_CREATOR: &str = "stride-tracker";

/// Errors from exporting an activity.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Activity has no route to export")]
    EmptyRoute,

    #[error("Timestamp out of range: {0}")]
    Time(String),

    #[error("Failed to write GPX: {0}")]
    Gpx(String),
}

/// Build a GPX 1.1 document with one track of the activity's route.
///
/// Samples carry no timestamps of their own, so point `i` of `n` is
/// stamped `start + (i / n) * duration`.
pub fn to_gpx(activity: &Activity) -> Result<Gpx, ExportError> {
    if activity.route.is_empty() {
        return Err(ExportError::EmptyRoute);
    }

    let start_ms = activity.start_time.timestamp_millis();
    let duration_ms = activity.duration_seconds.max(0.0) * 1000.0;
    let count = activity.route.len() as f64;

    let mut segment = TrackSegment::new();
    for (index, coord) in activity.route.iter().enumerate() {
        let offset_ms = (index as f64 / count * duration_ms).round() as i64;
        let mut point = Waypoint::new((*coord).into());
        point.time = Some(to_offset_date_time(start_ms + offset_ms)?.into());
        segment.points.push(point);
    }

    let mut track = Track::new();
    track.name = Some(activity.kind.to_string());
    track.type_ = Some(activity.kind.to_string());
    track.segments.push(segment);

    let line: LineString<f64> = activity
        .route
        .iter()
        .map(|c| geo::Coord { x: c.lng, y: c.lat })
        .collect();

    let metadata = Metadata {
        name: Some(format!(
            "{} - {}",
            activity.kind,
            format_utc_rfc3339(activity.start_time)
        )),
        time: Some(to_offset_date_time(start_ms)?.into()),
        bounds: line.bounding_rect(),
        ..Default::default()
    };

    let mut gpx: Gpx = Default::default();
    gpx.version = GpxVersion::Gpx11;
    gpx.creator = Some(GPX_CREATOR.to_string());
    gpx.metadata = Some(metadata);
    gpx.tracks.push(track);

    Ok(gpx)
}

/// Serialize an activity to GPX XML.
pub fn to_gpx_string(activity: &Activity) -> Result<String, ExportError> {
    let gpx = to_gpx(activity)?;
    let mut buf = Vec::new();
    gpx::write(&gpx, &mut buf).map_err(|e| ExportError::Gpx(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| ExportError::Gpx(e.to_string()))
}

/// Suggested download name for an activity's GPX.
pub fn gpx_file_name(activity: &Activity) -> String {
    format!("{}.gpx", activity.id)
}

/// Human-readable summary for sharing.
pub fn share_text(activity: &Activity) -> String {
    let pace = pace_min_per_km(activity.distance_meters, activity.duration_seconds);
    format!(
        "{}\nDistance: {}\nTime: {}\nPace: {}\nCalories: {} kcal\n\n#fitness #{}",
        share_title(activity.kind),
        format_distance(activity.distance_meters),
        format_duration(activity.duration_seconds),
        format_pace(pace),
        activity.calories,
        activity.kind
    )
}

fn share_title(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Running => "Run",
        ActivityKind::Cycling => "Ride",
        ActivityKind::Walking => "Walk",
    }
}

fn to_offset_date_time(millis: i64) -> Result<OffsetDateTime, ExportError> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|e| ExportError::Time(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityId, ActivityStatus, Coordinate};
    use chrono::{TimeZone, Utc};
    use std::io::BufReader;

    fn sample_activity() -> Activity {
        Activity {
            id: ActivityId(1_717_225_200_000),
            kind: ActivityKind::Running,
            status: ActivityStatus::Completed,
            start_time: Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap(),
            end_time: Some(Utc.with_ymd_and_hms(2024, 6, 1, 7, 20, 0).unwrap()),
            paused_ms: 0,
            route: vec![
                Coordinate::new(40.4168, -3.7038),
                Coordinate::new(40.4178, -3.7028),
                Coordinate::new(40.4190, -3.7010),
                Coordinate::new(40.4200, -3.7000),
            ],
            distance_meters: 4000.0,
            duration_seconds: 1200.0,
            calories: 280,
            avg_speed_kmh: 12.0,
            max_speed_kmh: 14.0,
        }
    }

    #[test]
    fn test_gpx_points_have_interpolated_times() {
        let activity = sample_activity();
        let gpx = to_gpx(&activity).unwrap();

        assert_eq!(gpx.version, GpxVersion::Gpx11);
        assert_eq!(gpx.tracks.len(), 1);
        let points = &gpx.tracks[0].segments[0].points;
        assert_eq!(points.len(), 4);

        // 1200 s over 4 points: 0, 300, 600, 900 s after start
        let start = OffsetDateTime::from_unix_timestamp(activity.start_time.timestamp()).unwrap();
        for (i, point) in points.iter().enumerate() {
            let expected: gpx::Time = (start + time::Duration::seconds(300 * i as i64)).into();
            assert_eq!(point.time, Some(expected));
        }
        assert_eq!(points[1].point().y(), 40.4178);
        assert_eq!(points[1].point().x(), -3.7028);
    }

    #[test]
    fn test_gpx_metadata() {
        let gpx = to_gpx(&sample_activity()).unwrap();
        let metadata = gpx.metadata.unwrap();
        assert_eq!(metadata.name.as_deref(), Some("running - 2024-06-01T07:00:00Z"));

        let bounds = metadata.bounds.unwrap();
        assert_eq!(bounds.min().y, 40.4168);
        assert_eq!(bounds.max().x, -3.7000);
        assert_eq!(gpx.tracks[0].type_.as_deref(), Some("running"));
    }

    #[test]
    fn test_gpx_string_reads_back() {
        let xml = to_gpx_string(&sample_activity()).unwrap();
        assert!(xml.contains("<trkpt"));

        let parsed = gpx::read(BufReader::new(xml.as_bytes())).unwrap();
        assert_eq!(parsed.tracks[0].segments[0].points.len(), 4);
        assert_eq!(parsed.creator.as_deref(), Some(GPX_CREATOR));
    }

    #[test]
    fn test_empty_route_is_rejected() {
        let mut activity = sample_activity();
        activity.route.clear();
        assert!(matches!(to_gpx(&activity), Err(ExportError::EmptyRoute)));
    }

    #[test]
    fn test_share_text() {
        let text = share_text(&sample_activity());
        assert_eq!(
            text,
            "Run\nDistance: 4.00 km\nTime: 20:00\nPace: 5:00 min/km\nCalories: 280 kcal\n\n#fitness #running"
        );
    }

    #[test]
    fn test_share_text_without_distance() {
        let mut activity = sample_activity();
        activity.distance_meters = 0.0;
        assert!(share_text(&activity).contains("Pace: -"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(gpx_file_name(&sample_activity()), "activity_1717225200000.gpx");
    }
}
