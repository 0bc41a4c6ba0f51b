// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OSRM routing client for pre-activity route planning.
//!
//! Handles:
//! - Mapping activity kinds to routing profiles
//! - Single-leg and multi-waypoint route requests
//! - Decoding the returned encoded polyline (precision 5)
//!
//! Only the planning surface uses this; tracking never waits on it.

use serde::Deserialize;

use crate::models::{ActivityKind, Coordinate};

/// Polyline precision requested from OSRM (`geometries=polyline`).
const POLYLINE_PRECISION: u32 = 5;

/// Routing profile understood by the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingProfile {
    Foot,
    Bike,
}

impl RoutingProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingProfile::Foot => "foot",
            RoutingProfile::Bike => "bike",
        }
    }
}

impl From<ActivityKind> for RoutingProfile {
    fn from(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::Running | ActivityKind::Walking => RoutingProfile::Foot,
            ActivityKind::Cycling => RoutingProfile::Bike,
        }
    }
}

/// Errors from route planning.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("Routing service error: {0}")]
    Http(String),

    #[error("No route found")]
    NoRouteFound,

    #[error("Need at least 2 points to create a route")]
    TooFewPoints,

    #[error("Invalid coordinate in route request")]
    InvalidCoordinate,

    #[error("Failed to decode route geometry: {0}")]
    InvalidGeometry(String),
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
}

/// Routing service client.
#[derive(Clone)]
pub struct RoutingService {
    http: reqwest::Client,
    base_url: String,
}

impl RoutingService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Route between two points.
    pub async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        kind: ActivityKind,
    ) -> Result<Vec<Coordinate>, RoutingError> {
        self.fetch_multi_point_route(&[start, end], kind).await
    }

    /// Route through every waypoint in order.
    pub async fn fetch_multi_point_route(
        &self,
        points: &[Coordinate],
        kind: ActivityKind,
    ) -> Result<Vec<Coordinate>, RoutingError> {
        let url = route_url(&self.base_url, points, kind.into())?;
        tracing::debug!(%url, points = points.len(), "Requesting route");

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "polyline")])
            .send()
            .await
            .map_err(|e| RoutingError::Http(e.to_string()))?;

        let status = response.status();
        // OSRM answers 400 with code "NoRoute" when the points can't be joined.
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            tracing::warn!(status = %status, "Routing service returned an error");
            return Err(RoutingError::Http(format!("status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::Http(e.to_string()))?;

        if !status.is_success() {
            return match serde_json::from_str::<OsrmResponse>(&body) {
                Ok(parsed) if parsed.code == "NoRoute" => Err(RoutingError::NoRouteFound),
                _ => Err(RoutingError::Http(format!("status {}", status))),
            };
        }

        let route = parse_route_response(&body)?;
        tracing::info!(points = route.len(), profile = RoutingProfile::from(kind).as_str(), "Route planned");
        Ok(route)
    }
}

/// Build `{base}/route/v1/{profile}/{lng,lat;lng,lat...}`.
fn route_url(
    base_url: &str,
    points: &[Coordinate],
    profile: RoutingProfile,
) -> Result<String, RoutingError> {
    if points.len() < 2 {
        return Err(RoutingError::TooFewPoints);
    }
    if !points.iter().all(Coordinate::is_valid) {
        return Err(RoutingError::InvalidCoordinate);
    }

    let waypoints: Vec<String> = points
        .iter()
        .map(|p| format!("{},{}", p.lng, p.lat))
        .collect();

    Ok(format!(
        "{}/route/v1/{}/{}",
        base_url,
        profile.as_str(),
        waypoints.join(";")
    ))
}

/// Extract the first route's geometry from an OSRM response body.
fn parse_route_response(body: &str) -> Result<Vec<Coordinate>, RoutingError> {
    let parsed: OsrmResponse = serde_json::from_str(body)
        .map_err(|e| RoutingError::Http(format!("Malformed routing response: {}", e)))?;

    if parsed.code != "Ok" {
        return Err(RoutingError::NoRouteFound);
    }
    let route = parsed.routes.into_iter().next().ok_or(RoutingError::NoRouteFound)?;

    let line = polyline::decode_polyline(&route.geometry, POLYLINE_PRECISION)
        .map_err(|e| RoutingError::InvalidGeometry(e.to_string()))?;

    Ok(line.0.into_iter().map(Coordinate::from).collect())
}
