//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name for logs
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Deployment environment (development, staging, production)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "storefront".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            environment: "development".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SF_SERVICE_NAME`: Service name (default: storefront)
    /// - `SF_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `SF_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `SF_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `SF_ENVIRONMENT`: Environment label (default: development)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("SF_SERVICE_NAME")
                .unwrap_or_else(|_| "storefront".to_string()),

            log_level: env::var("SF_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("SF_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),

            json_logs: env::var("SF_JSON_LOGS")
                .map(|v| parse_flag(&v, false))
                .unwrap_or(is_container),

            environment: env::var("SF_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Whether this configuration targets a production deployment.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Interpret a boolean environment flag, falling back to `default` for
/// values that are neither truthy nor falsy.
fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
