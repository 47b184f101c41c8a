//! Prometheus metrics for request latency and todo lifecycle.
//!
//! This module provides metrics for:
//! - HTTP request duration by method, route and status code
//! - Todos created, completed and deleted
//! - Current number of active (incomplete) todos
//! - Database errors by operation
//! - Database connectivity
//!
//! Each [`Metrics`] owns its own recorder instead of installing a global
//! one, so handlers receive the registry through application state and
//! tests get isolated counters.

use std::time::Duration;

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram,
    with_local_recorder, Counter, Gauge, Unit,
};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use tracing::debug;

use crate::store::StorageOp;

// === Metric Name Constants ===

/// HTTP request duration histogram metric name.
pub const METRIC_HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
/// Todos created counter metric name.
pub const METRIC_TODOS_CREATED: &str = "todos_created_total";
/// Todos completed counter metric name.
pub const METRIC_TODOS_COMPLETED: &str = "todos_completed_total";
/// Todos deleted counter metric name.
pub const METRIC_TODOS_DELETED: &str = "todos_deleted_total";
/// Active todos gauge metric name.
pub const METRIC_ACTIVE_TODOS: &str = "active_todos_count";
/// Database errors counter metric name.
pub const METRIC_DB_ERRORS: &str = "db_errors_total";
/// Database connectivity gauge metric name.
pub const METRIC_MONGO_CONNECTIONS: &str = "mongo_connections_active";

/// Request duration buckets, in seconds.
pub const HTTP_DURATION_BUCKETS: &[f64] = &[0.1, 0.5, 1.0, 2.0, 5.0];

/// Process-wide metrics registry.
pub struct Metrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    todos_created: Counter,
    todos_completed: Counter,
    todos_deleted: Counter,
    active_todos: Gauge,
    mongo_connected: Gauge,
}

impl Metrics {
    /// Build the recorder and register all metrics with descriptions.
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(METRIC_HTTP_REQUEST_DURATION.to_string()),
                HTTP_DURATION_BUCKETS,
            )?
            .build_recorder();
        let handle = recorder.handle();

        let (todos_created, todos_completed, todos_deleted, active_todos, mongo_connected) =
            with_local_recorder(&recorder, || {
                describe_histogram!(
                    METRIC_HTTP_REQUEST_DURATION,
                    Unit::Seconds,
                    "Duration of HTTP requests in seconds"
                );
                describe_counter!(METRIC_TODOS_CREATED, "Total number of todos created");
                describe_counter!(METRIC_TODOS_COMPLETED, "Total number of todos marked as completed");
                describe_counter!(METRIC_TODOS_DELETED, "Total number of todos deleted");
                describe_gauge!(METRIC_ACTIVE_TODOS, "Current number of active (incomplete) todos");
                describe_counter!(METRIC_DB_ERRORS, "Total number of database errors");
                describe_gauge!(
                    METRIC_MONGO_CONNECTIONS,
                    "MongoDB connection status (1=connected, 0=disconnected)"
                );

                (
                    counter!(METRIC_TODOS_CREATED),
                    counter!(METRIC_TODOS_COMPLETED),
                    counter!(METRIC_TODOS_DELETED),
                    gauge!(METRIC_ACTIVE_TODOS),
                    gauge!(METRIC_MONGO_CONNECTIONS),
                )
            });

        debug!("Metrics initialized");

        Ok(Self {
            recorder,
            handle,
            todos_created,
            todos_completed,
            todos_deleted,
            active_todos,
            mongo_connected,
        })
    }

    /// Record one HTTP request.
    pub fn observe_request(&self, method: &str, route: &str, status_code: u16, elapsed: Duration) {
        with_local_recorder(&self.recorder, || {
            histogram!(
                METRIC_HTTP_REQUEST_DURATION,
                "method" => method.to_string(),
                "route" => route.to_string(),
                "status_code" => status_code.to_string()
            )
            .record(elapsed.as_secs_f64());
        });
    }

    /// Increment todos created counter.
    pub fn inc_todos_created(&self) {
        self.todos_created.increment(1);
    }

    /// Increment todos completed counter.
    pub fn inc_todos_completed(&self) {
        self.todos_completed.increment(1);
    }

    /// Increment todos deleted counter.
    pub fn inc_todos_deleted(&self) {
        self.todos_deleted.increment(1);
    }

    /// Publish the current active todo count.
    pub fn set_active_todos(&self, count: u64) {
        self.active_todos.set(count as f64);
    }

    /// Increment the database error counter for `op`.
    pub fn inc_db_errors(&self, op: StorageOp) {
        with_local_recorder(&self.recorder, || {
            counter!(METRIC_DB_ERRORS, "operation" => op.to_string()).increment(1);
        });
    }

    /// Set database connectivity (1 connected, 0 not).
    pub fn set_mongo_connected(&self, connected: bool) {
        self.mongo_connected.set(if connected { 1.0 } else { 0.0 });
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Value of one series in rendered exposition text.
///
/// `series` is the metric name plus its label set exactly as rendered,
/// e.g. `db_errors_total{operation="count"}`.
pub fn scrape_value(rendered: &str, series: &str) -> Option<f64> {
    rendered.lines().find_map(|line| {
        let rest = line.strip_prefix(series)?;
        rest.strip_prefix(' ')?.trim().parse().ok()
    })
}
