//! Logging setup
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter directive for a configured level
pub fn filter_directive(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        "payroll_console=info".to_string()
    } else if level.contains('=') || level.contains(',') {
        // Already a full directive list
        level.to_string()
    } else {
        format!("payroll_console={}", level.to_lowercase())
    }
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("debug"), "payroll_console=debug");
        assert_eq!(filter_directive("WARN"), "payroll_console=warn");
        assert_eq!(filter_directive(""), "payroll_console=info");
        assert_eq!(
            filter_directive("payroll_console=trace,reqwest=debug"),
            "payroll_console=trace,reqwest=debug"
        );
    }
}
