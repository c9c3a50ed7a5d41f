//! Prometheus metrics for the storefront subsystems.
//!
//! All metrics follow the naming convention: `sf_<subsystem>_<metric>_<unit>`
//!
//! Counters are usable before `register_metrics` runs; registration only
//! exposes them through `encode_metrics`.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // AUTH SESSION METRICS (Subsystem 1)
    // =========================================================================

    /// Session state transitions by triggering event
    pub static ref SESSION_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("sf_auth_session_transitions_total", "Session transitions by event"),
        &["event", "outcome"]  // outcome: applied/ignored/failed
    ).expect("metric creation failed");

    /// Provisioning outcomes
    pub static ref PROVISIONING_OUTCOMES: CounterVec = CounterVec::new(
        Opts::new("sf_auth_provisioning_outcomes_total", "User provisioning outcomes"),
        &["outcome"]  // outcome: created/existing/duplicate/failed/stale
    ).expect("metric creation failed");

    /// Provisioning duration (lookup plus optional create)
    pub static ref PROVISIONING_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "sf_auth_provisioning_duration_seconds",
            "Time spent provisioning a user record"
        ).buckets(exponential_buckets(0.001, 2.0, 12).expect("bucket layout"))
    ).expect("metric creation failed");

    // =========================================================================
    // LIVE LIST METRICS (Subsystem 2)
    // =========================================================================

    /// Merge results for live creation events
    pub static ref CACHE_MERGES: CounterVec = CounterVec::new(
        Opts::new("sf_live_list_merges_total", "Live creation merges"),
        &["result"]  // result: applied/duplicate/disposed
    ).expect("metric creation failed");

    /// Fetch outcomes
    pub static ref CACHE_FETCHES: CounterVec = CounterVec::new(
        Opts::new("sf_live_list_fetches_total", "Paginated fetch outcomes"),
        &["outcome"]  // outcome: loaded/busy/stale/failed
    ).expect("metric creation failed");

    /// Items currently held by the most recently updated cache
    pub static ref CACHE_SIZE: Gauge = Gauge::new(
        "sf_live_list_items",
        "Number of items in the live list cache"
    ).expect("metric creation failed");

    // =========================================================================
    // SEARCH METRICS (Subsystem 3)
    // =========================================================================

    /// Search executions
    pub static ref SEARCH_QUERIES: CounterVec = CounterVec::new(
        Opts::new("sf_search_queries_total", "Search overlay executions"),
        &["outcome"]  // outcome: hits/empty
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT BUS METRICS
    // =========================================================================

    /// Hub capsules handled by listeners
    pub static ref EVENT_BUS_MESSAGES_RECEIVED: CounterVec = CounterVec::new(
        Opts::new("sf_eventbus_messages_received_total", "Capsules received from the hub"),
        &["channel", "name"]
    ).expect("metric creation failed");
}

/// Handle to the registered metrics.
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Registry the metrics were registered with.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Auth session
        Box::new(SESSION_TRANSITIONS.clone()),
        Box::new(PROVISIONING_OUTCOMES.clone()),
        Box::new(PROVISIONING_DURATION.clone()),
        // Live list
        Box::new(CACHE_MERGES.clone()),
        Box::new(CACHE_FETCHES.clone()),
        Box::new(CACHE_SIZE.clone()),
        // Search
        Box::new(SEARCH_QUERIES.clone()),
        // Event bus
        Box::new(EVENT_BUS_MESSAGES_RECEIVED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
