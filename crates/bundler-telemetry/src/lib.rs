//! # Bundler Telemetry
//!
//! Observability for the bundler runtime.
//!
//! - **Logs**: `tracing-subscriber` registry with an `EnvFilter` and either a
//!   JSON layer (containers) or a human-readable fmt layer (development)
//! - **Metrics**: Prometheus counters and histograms in a dedicated registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bundler_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BUNDLER_LOG_LEVEL` | `RUST_LOG`, then `info` | Log filter directive |
//! | `BUNDLER_JSON_LOGS` | `false` (`true` in containers) | JSON formatted logs |
//! | `BUNDLER_SERVICE_NAME` | `mev-bundler` | Service name attached to logs |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BUNDLES_SUBMITTED, BUNDLE_SIZE,
    CYCLES_DETECTED, ITEMS_ADMITTED, ITEMS_REJECTED, MISSING_DEPENDENCIES, PENDING_ITEMS,
    SUBMISSION_FAILURES, TICK_DURATION,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)?;
    register_metrics()?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(())
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
