//! Configuration validation for Zero services.
//!
//! Provides validation logic for configuration fields to ensure
//! all values are within valid ranges before a screener is built from them.

use thiserror::Error;

use crate::config::{BreakoutConfig, Config, ObservabilityConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if let Err(e) = self.breakout.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load with environment overrides and validate configuration.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }

    /// Load from a specific directory and validate configuration.
    pub fn load_and_validate_from_dir(dir: &std::path::Path) -> anyhow::Result<Self> {
        let config = Self::load_from_dir(dir)?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }

        Ok(())
    }
}

impl Validate for BreakoutConfig {
    fn validate(&self) -> ValidationResult<()> {
        let checks = [
            ("breakout.volume_ratio_threshold", self.volume_ratio_threshold, true),
            ("breakout.max_price_change_percent", self.max_price_change_percent, false),
            ("breakout.min_buyer_seller_ratio", self.min_buyer_seller_ratio, true),
        ];

        for (field, value, non_negative) in checks {
            if !value.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: format!("must be a finite number, got {value}"),
                });
            }
            // Price change may be negative (only falling stocks pass), ratios may not
            if non_negative && value < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: format!("must not be negative, got {value}"),
                });
            }
        }

        Ok(())
    }
}
