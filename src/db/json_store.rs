// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted state as a single JSON blob.
//!
//! Layout: `{ "settings": ..., "activities": [...] }` with activities most
//! recent first. The in-flight activity is never written.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{Activity, UserSettings};

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Errors from the blob store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Corrupt state file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed store. A mock store keeps nothing.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: Option<PathBuf>,
}

impl JsonStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Create a store that never touches disk (tests).
    pub fn new_mock() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load the saved state. A missing file is an empty state.
    pub async fn load(&self) -> Result<PersistedState, StoreError> {
        let Some(path) = &self.path else {
            return Ok(PersistedState::default());
        };

        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No saved state, starting fresh");
                return Ok(PersistedState::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let state: PersistedState =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        tracing::info!(
            path = %path.display(),
            activities = state.activities.len(),
            "Loaded saved state"
        );
        Ok(state)
    }

    /// Replace the saved state (write to a temp file, then rename).
    pub async fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_vec(state)?;
        let write_err = |source| StoreError::Write {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(write_err)?;

        tracing::debug!(
            path = %path.display(),
            activities = state.activities.len(),
            bytes = json.len(),
            "State saved"
        );
        Ok(())
    }
}
