//! Logging utilities for Zero services.
//!
//! Provides structured JSON logging with trace IDs for observability.
//!
//! # Noise Filtering
//!
//! Targets listed in [`ObservabilityConfig::excluded_targets`] are set to
//! `warn` so business logs stay readable at the configured level.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;

/// Build the EnvFilter with noise suppression.
///
/// `RUST_LOG` takes precedence when set.
fn build_filter(log_level: &str, excluded_targets: &[String]) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(filter_directives(log_level, excluded_targets))
}

fn filter_directives(log_level: &str, excluded_targets: &[String]) -> String {
    let mut directives = String::from(log_level);

    for target in excluded_targets {
        directives.push_str(&format!(",{}=warn", target));
    }

    directives
}

/// Initialize logging with the given configuration.
///
/// # Arguments
///
/// * `log_level` - Base log level (trace, debug, info, warn, error)
/// * `log_format` - Output format: "json" for structured JSON, "pretty" for human-readable
pub fn init_logging(log_level: &str, log_format: &str) {
    init_logging_with_exclusions(log_level, log_format, &[]);
}

/// Initialize logging from an [`ObservabilityConfig`].
pub fn init_from_config(config: &ObservabilityConfig) {
    init_logging_with_exclusions(
        &config.log_level,
        &config.log_format,
        &config.excluded_targets,
    );
}

/// Initialize logging with custom excluded targets.
///
/// Like `init_logging`, but allows specifying modules to hold at `warn`.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging_with_exclusions(
    log_level: &str,
    log_format: &str,
    excluded_targets: &[String],
) {
    let filter = build_filter(log_level, excluded_targets);

    let subscriber = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        let _ = subscriber.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(true)
            .with_file(false)
            .with_line_number(false);
        let _ = subscriber.with(fmt_layer).try_init();
    }

    tracing::info!(
        log_level = %log_level,
        log_format = %log_format,
        noise_filtered = excluded_targets.len(),
        "Logging initialized"
    );
}

/// Generate a new trace ID for a screening run.
pub fn generate_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Create a tracing span for evaluating one instrument.
///
/// # Example
///
/// ```ignore
/// let trace_id = generate_trace_id();
/// let span = screening_span!(trace_id, "005930");
/// let _enter = span.enter();
/// // ... evaluate instrument
/// ```
#[macro_export]
macro_rules! screening_span {
    ($trace_id:expr, $symbol:expr) => {
        tracing::info_span!("screening", trace_id = %$trace_id, symbol = %$symbol)
    };
    ($trace_id:expr, $symbol:expr, $($field:tt)*) => {
        tracing::info_span!("screening", trace_id = %$trace_id, symbol = %$symbol, $($field)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        let excluded = vec!["zero_breakout::window".to_string()];
        assert_eq!(
            filter_directives("debug", &excluded),
            "debug,zero_breakout::window=warn"
        );
        assert_eq!(filter_directives("info", &[]), "info");
    }

    #[test]
    fn test_generate_trace_id() {
        let id1 = generate_trace_id();
        let id2 = generate_trace_id();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36); // UUID format
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging("warn", "pretty");
        init_from_config(&ObservabilityConfig::default());
    }
}
