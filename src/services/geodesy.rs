// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle distances over sampled routes.

use geo::{Distance, HaversineMeasure, Point};

use crate::models::Coordinate;

/// Mean Earth radius used for all distances (meters).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

const EARTH: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_METERS);

/// Haversine distance between two coordinates, in meters.
///
/// Rounding can push the haversine term just past 1 for antipodal points,
/// which yields NaN; that case is half a great circle.
pub fn haversine(a: Coordinate, b: Coordinate) -> f64 {
    let d = EARTH.distance(Point::from(a), Point::from(b));
    if d.is_nan() {
        std::f64::consts::PI * EARTH_RADIUS_METERS
    } else {
        d
    }
}

/// Total length of a route in meters. Zero for fewer than two points.
pub fn route_distance(route: &[Coordinate]) -> f64 {
    route.windows(2).map(|leg| haversine(leg[0], leg[1])).sum()
}
