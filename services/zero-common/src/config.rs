//! Configuration management for Zero services.
//!
//! All Zero services share a unified configuration directory at `~/.codecoder/`.
//! The breakout screener reads its thresholds from the `breakout` section of
//! `config.json`, optionally overridden by a standalone `breakout.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (ZERO_* prefix)
//! 2. Modular files (`breakout.json`)
//! 3. Explicit `config.json` values
//! 4. Default values
//!
//! # Environment Variable Mapping
//!
//! ## Observability
//! - `ZERO_LOG_LEVEL` → observability.log_level
//! - `ZERO_LOG_FORMAT` → observability.log_format
//!
//! ## Breakout Screener
//! - `ZERO_BREAKOUT_VOLUME_RATIO_THRESHOLD` → breakout.volume_ratio_threshold
//! - `ZERO_BREAKOUT_MAX_PRICE_CHANGE_PERCENT` → breakout.max_price_change_percent
//! - `ZERO_BREAKOUT_MIN_BUYER_SELLER_RATIO` → breakout.min_buyer_seller_ratio

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config_loader::load_modular_config;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new()
        .map_or_else(
            || PathBuf::from(".codecoder"),
            |dirs| dirs.home_dir().join(".codecoder"),
        )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure for the breakout screener.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// JSON Schema reference
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Breakout screener thresholds
    #[serde(default)]
    pub breakout: BreakoutConfig,
}

impl Config {
    /// Load configuration from the default directory.
    ///
    /// Missing files are not an error; defaults are used instead.
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&config_dir())
    }

    /// Load configuration from a specific directory, merging modular files.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let value = load_modular_config(Some(dir.to_path_buf()))?;

        serde_json::from_value(value)
            .with_context(|| format!("Failed to parse config from {}", dir.display()))
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using a custom variable lookup.
    ///
    /// Values that fail to parse, or parse to NaN or infinity, are ignored and
    /// the file value is kept.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("ZERO_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("ZERO_LOG_FORMAT") {
            self.observability.log_format = format;
        }

        let parse = |key: &str| -> Option<f64> {
            let raw = lookup(key)?;
            match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    tracing::warn!(key, value = %raw, "Ignoring unparseable override");
                    None
                }
            }
        };

        if let Some(v) = parse("ZERO_BREAKOUT_VOLUME_RATIO_THRESHOLD") {
            self.breakout.volume_ratio_threshold = v;
        }
        if let Some(v) = parse("ZERO_BREAKOUT_MAX_PRICE_CHANGE_PERCENT") {
            self.breakout.max_price_change_percent = v;
        }
        if let Some(v) = parse("ZERO_BREAKOUT_MIN_BUYER_SELLER_RATIO") {
            self.breakout.min_buyer_seller_ratio = v;
        }
    }
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Aliases: "level" for backward compatibility with existing config files
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    /// Aliases: "format" for backward compatibility with existing config files
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to exclude from logging.
    ///
    /// These modules will be set to `warn` level to reduce noise.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Breakout Screener Configuration
// ============================================================================

/// Default multiple of the 20-day average volume today's volume must reach.
pub const VOLUME_RATIO_THRESHOLD: f64 = 2.0;

/// Default ceiling on the day's price change (%). Larger moves are already extended.
pub const MAX_PRICE_CHANGE_PERCENT: f64 = 2.0;

/// Default floor on average buy trade size over average sell trade size.
pub const MIN_BUYER_SELLER_RATIO: f64 = 3.0;

/// Thresholds for the momentum/volume breakout screener.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakoutConfig {
    /// Today's volume must be at least this multiple of the 20-trading-day average
    #[serde(default = "default_volume_ratio_threshold")]
    pub volume_ratio_threshold: f64,

    /// Maximum price change (%) for the day; strictly greater fails
    #[serde(default = "default_max_price_change_percent")]
    pub max_price_change_percent: f64,

    /// Minimum buyer/seller intensity ratio; strictly less fails
    #[serde(default = "default_min_buyer_seller_ratio")]
    pub min_buyer_seller_ratio: f64,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            volume_ratio_threshold: default_volume_ratio_threshold(),
            max_price_change_percent: default_max_price_change_percent(),
            min_buyer_seller_ratio: default_min_buyer_seller_ratio(),
        }
    }
}

fn default_volume_ratio_threshold() -> f64 {
    VOLUME_RATIO_THRESHOLD
}

fn default_max_price_change_percent() -> f64 {
    MAX_PRICE_CHANGE_PERCENT
}

fn default_min_buyer_seller_ratio() -> f64 {
    MIN_BUYER_SELLER_RATIO
}
