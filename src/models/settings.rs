// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User settings, persisted alongside the activity history.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

/// User preferences. Body weight feeds the calorie estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Body weight in kg
    #[serde(default = "default_weight")]
    pub weight_kg: f64,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub units: UnitSystem,
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default)]
    pub language: Language,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT_KG
}

fn default_true() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            name: None,
            weight_kg: DEFAULT_WEIGHT_KG,
            theme: Theme::default(),
            units: UnitSystem::default(),
            auto_start: false,
            sound_enabled: true,
            language: Language::default(),
        }
    }
}

/// Partial settings update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SettingsUpdate {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = 500.0))]
    pub weight_kg: Option<f64>,
    pub theme: Option<Theme>,
    pub units: Option<UnitSystem>,
    pub auto_start: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub language: Option<Language>,
}

impl UserSettings {
    /// Merge a partial update into these settings.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(name) = update.name {
            self.name = if name.is_empty() { None } else { Some(name) };
        }
        if let Some(weight) = update.weight_kg {
            self.weight_kg = weight;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(units) = update.units {
            self.units = units;
        }
        if let Some(auto_start) = update.auto_start {
            self.auto_start = auto_start;
        }
        if let Some(sound_enabled) = update.sound_enabled {
            self.sound_enabled = sound_enabled;
        }
        if let Some(language) = update.language {
            self.language = language;
        }
    }
}
