//! # Storefront Telemetry
//!
//! Observability for the storefront synchronization layer.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by a `tracing-subscriber` fmt layer
//!   (pretty for development, JSON for shipping to a log aggregator)
//! - **Metrics**: Prometheus counters for session transitions, provisioning
//!   outcomes and cache merges
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SF_SERVICE_NAME` | `storefront` | Service name in logs |
//! | `SF_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `SF_CONSOLE_OUTPUT` | `true` | Emit logs to stdout |
//! | `SF_JSON_LOGS` | `false` | JSON formatted logs |
//! | `SF_ENVIRONMENT` | `development` | Deployment environment label |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, CACHE_FETCHES, CACHE_MERGES, CACHE_SIZE,
    EVENT_BUS_MESSAGES_RECEIVED, PROVISIONING_DURATION, PROVISIONING_OUTCOMES, SEARCH_QUERIES,
    SESSION_TRANSITIONS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize log subscriber: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;
    init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Convenience macro for creating a span with subsystem context.
///
/// # Example
///
/// ```rust,ignore
/// use storefront_telemetry::subsystem_span;
///
/// let _span = subsystem_span!("provision", subsystem = "auth-session", subject_id = %id);
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
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
