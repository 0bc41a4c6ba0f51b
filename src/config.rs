//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
const MIN_TICK_INTERVAL_MS: u64 = 10;
const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Where settings and history are persisted
    pub data_path: PathBuf,
    /// Base URL of the OSRM routing service
    pub osrm_base_url: String,
    /// Cadence of the metrics ticker while an activity exists
    pub tick_interval: Duration,
    /// Maximum activities kept in history; `None` is unbounded
    pub history_limit: Option<usize>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:3000".to_string(),
            data_path: PathBuf::from("data/tracker.json"),
            osrm_base_url: "http://127.0.0.1:9".to_string(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl Config {
    /// Config for tests: never reaches the network, never touches disk.
    pub fn test_default() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let tick_ms = parse_var("TICK_INTERVAL_MS", DEFAULT_TICK_INTERVAL_MS)?;
        if tick_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::Invalid {
                key: "TICK_INTERVAL_MS",
                value: tick_ms.to_string(),
            });
        }

        let history_limit = match parse_var("HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)? {
            0 => None,
            n => Some(n),
        };

        Ok(Self {
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            data_path: env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/tracker.json")),
            osrm_base_url: env::var("OSRM_BASE_URL")
                .unwrap_or_else(|_| "https://router.project-osrm.org".to_string()),
            tick_interval: Duration::from_millis(tick_ms),
            history_limit,
        })
    }
}

/// Read and parse an optional variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
