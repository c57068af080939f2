//! Monitor configuration - classification bands, buffer capacities, and
//! timer intervals as operator-tunable TOML values.
//!
//! Every struct implements `Default` with values matching the constants in
//! [`defaults`](super::defaults), so behavior is unchanged when no config
//! file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// Errors raised while loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a monitor deployment.
///
/// Load with [`MonitorConfig::load`], which searches:
/// 1. `$AEGISOPS_CONFIG` env var
/// 2. `./monitor_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MonitorConfig {
    /// Classification bands for sensor channels and health scores
    #[serde(default)]
    pub bands: ClassifierBands,

    /// Rolling buffer capacities
    #[serde(default)]
    pub buffers: BufferConfig,

    /// Timer intervals
    #[serde(default)]
    pub intervals: IntervalConfig,

    /// Fleet roster
    #[serde(default)]
    pub fleet: FleetConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl MonitorConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("AEGISOPS_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded monitor config from AEGISOPS_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from AEGISOPS_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "AEGISOPS_CONFIG points to non-existent file, falling back");
            }
        }

        let local = Path::new("monitor_config.toml");
        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "Loaded monitor config");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse ./monitor_config.toml, using defaults");
                }
            }
        }

        info!("No config file found - using built-in defaults");
        Self::default()
    }

    /// Load and parse a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        for warning in super::validate(&config) {
            warn!(field = %warning.field, "{warning}");
        }

        Ok(config)
    }
}

// ============================================================================
// Classification Bands
// ============================================================================

/// Numeric bands for the threshold classifier.
///
/// A value exactly on a threshold belongs to the higher-severity band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierBands {
    /// RMS vibration warning threshold (mm/s)
    pub vibration_warning: f64,
    /// RMS vibration critical threshold (mm/s)
    pub vibration_critical: f64,
    /// Temperature warning threshold (°C)
    pub temperature_warning: f64,
    /// Temperature critical threshold (°C)
    pub temperature_critical: f64,
    /// Kurtosis above this indicates bearing-health risk
    pub kurtosis_elevated: f64,
    /// Health score cut: at or below is Critical
    pub health_cut_critical: f64,
    /// Health score cut: at or below is Degraded
    pub health_cut_degraded: f64,
    /// Health score cut: at or below is Moderate
    pub health_cut_moderate: f64,
    /// Health score cut: at or below is Good, above is Optimal
    pub health_cut_good: f64,
}

impl Default for ClassifierBands {
    fn default() -> Self {
        Self {
            vibration_warning: defaults::VIBRATION_WARNING,
            vibration_critical: defaults::VIBRATION_CRITICAL,
            temperature_warning: defaults::TEMPERATURE_WARNING,
            temperature_critical: defaults::TEMPERATURE_CRITICAL,
            kurtosis_elevated: defaults::KURTOSIS_ELEVATED,
            health_cut_critical: defaults::HEALTH_CUT_CRITICAL,
            health_cut_degraded: defaults::HEALTH_CUT_DEGRADED,
            health_cut_moderate: defaults::HEALTH_CUT_MODERATE,
            health_cut_good: defaults::HEALTH_CUT_GOOD,
        }
    }
}

// ============================================================================
// Buffers
// ============================================================================

/// Rolling buffer capacities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Telemetry readings retained per machine
    pub reading_capacity: usize,
    /// Alert entries retained for the console view
    pub console_log_capacity: usize,
    /// Alert entries retained for the full log view
    pub full_log_capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            reading_capacity: defaults::READING_BUFFER_CAPACITY,
            console_log_capacity: defaults::CONSOLE_LOG_CAPACITY,
            full_log_capacity: defaults::FULL_LOG_CAPACITY,
        }
    }
}

// ============================================================================
// Timers
// ============================================================================

/// Timer intervals (seconds). These are configuration, not protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalConfig {
    /// Console sampling tick
    pub console_tick_secs: u64,
    /// Live telemetry "latest" poll
    pub latest_poll_secs: u64,
    /// Fleet summary refresh
    pub fleet_refresh_secs: u64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            console_tick_secs: defaults::CONSOLE_TICK_SECS,
            latest_poll_secs: defaults::LATEST_POLL_SECS,
            fleet_refresh_secs: defaults::FLEET_REFRESH_SECS,
        }
    }
}

// ============================================================================
// Fleet
// ============================================================================

/// Machine roster for the fleet view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    pub machines: Vec<String>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            machines: vec![
                "CNC-ALPHA-921".to_string(),
                "CNC-ALPHA-922".to_string(),
                "CNC-BETA-101".to_string(),
                "CNC-BETA-102".to_string(),
                "MILL-GAMMA-301".to_string(),
                "MILL-GAMMA-302".to_string(),
                "LATHE-DELTA-401".to_string(),
                "LATHE-DELTA-402".to_string(),
            ],
        }
    }
}

// ============================================================================
// Server
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the dashboard API
    pub addr: String,
    /// Base URL of the external prediction service
    pub prediction_service_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            prediction_service_url: "http://127.0.0.1:8000/api/v1".to_string(),
        }
    }
}
