// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map route-planning state owned by the application around the engine.

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    #[default]
    Free,
    Tracking,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningState {
    /// Waypoints picked by the user
    pub selected_points: Vec<Coordinate>,
    /// Polyline returned by the routing service
    pub planned_route: Vec<Coordinate>,
    pub mode: MapMode,
}

impl PlanningState {
    /// Drop the selected points and planned route, keeping the mode.
    pub fn clear_route(&mut self) {
        self.selected_points.clear();
        self.planned_route.clear();
    }
}
