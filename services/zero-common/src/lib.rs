//! Zero Common - Shared configuration and logging for the Zero ecosystem.
//!
//! This crate provides:
//! - Configuration types and loading
//! - Configuration validation
//! - Logging setup and structured logging helpers

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod config_loader;
pub mod logging;
pub mod validation;

pub use config::{BreakoutConfig, Config, ObservabilityConfig};
pub use validation::{Validate, ValidationError, ValidationResult};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{BreakoutConfig, Config, ObservabilityConfig};
    pub use crate::logging::{generate_trace_id, init_logging};
    pub use crate::validation::{Validate, ValidationError};
}
