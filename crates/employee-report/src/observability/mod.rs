//! Observability module for logging and metrics

#[cfg(feature = "metrics")]
mod metrics;

#[cfg(feature = "metrics")]
pub use metrics::{init_metrics, record_fetch, record_fetch_error, record_request, render_metrics};

use tracing_subscriber::EnvFilter;

use crate::Result;
use crate::config::TelemetryConfig;

/// Initialize observability stack
pub fn init_observability(config: &TelemetryConfig) -> Result<()> {
    init_logging(config)?;

    #[cfg(feature = "metrics")]
    {
        init_metrics()?;
    }

    tracing::debug!(service = %config.service_name, "Observability initialized");
    Ok(())
}

/// Build the log filter.
///
/// A forced level (set on the command line) beats `rust_log`; otherwise a
/// valid `rust_log` directive beats the configured level.
fn env_filter(rust_log: Option<&str>, config: &TelemetryConfig) -> EnvFilter {
    if config.log_level_forced {
        return EnvFilter::new(&config.log_level);
    }

    rust_log
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(&config.log_level))
}

fn init_logging(config: &TelemetryConfig) -> Result<()> {
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(env_filter(rust_log.as_deref(), config))
        .with(fmt_layer)
        .try_init()
        .map_err(|e| crate::Error::Config(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry(log_level: &str, log_level_forced: bool) -> TelemetryConfig {
        TelemetryConfig {
            service_name: "svc".to_string(),
            log_level: log_level.to_string(),
            log_level_forced,
            json_logs: false,
        }
    }

    #[test]
    fn test_env_filter_uses_configured_level() {
        let filter = env_filter(None, &telemetry("warn", false));
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_env_filter_rust_log_beats_configured_level() {
        let filter = env_filter(Some("trace"), &telemetry("warn", false));
        assert_eq!(filter.to_string(), "trace");
    }

    #[test]
    fn test_env_filter_forced_level_beats_rust_log() {
        let filter = env_filter(Some("error"), &telemetry("debug", true));
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_env_filter_blank_or_invalid_rust_log_falls_back() {
        let filter = env_filter(Some(""), &telemetry("warn", false));
        assert_eq!(filter.to_string(), "warn");

        let filter = env_filter(Some("employee_report=loud"), &telemetry("warn", false));
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert!(config.service_name.is_empty());
        assert!(config.log_level.is_empty());
        assert!(!config.log_level_forced);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_telemetry_config_clone() {
        let config = TelemetryConfig {
            service_name: "test".to_string(),
            log_level: "info".to_string(),
            log_level_forced: false,
            json_logs: true,
        };
        let cloned = config.clone();
        assert_eq!(cloned.service_name, config.service_name);
        assert!(cloned.json_logs);
    }
}
