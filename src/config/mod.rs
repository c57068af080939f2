//! Monitor Configuration Module
//!
//! Per-deployment configuration loaded from TOML, replacing hardcoded
//! classification bands and timer intervals with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `AEGISOPS_CONFIG` environment variable (path to TOML file)
//! 2. `monitor_config.toml` in the current working directory
//! 3. Built-in defaults (matching the original dashboard constants)

pub mod defaults;
mod monitor_config;
mod validation;

pub use monitor_config::{
    BufferConfig, ClassifierBands, ConfigError, FleetConfig, IntervalConfig, MonitorConfig,
    ServerConfig,
};
pub use validation::{validate, ValidationWarning};
