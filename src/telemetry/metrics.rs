//! Prometheus metrics setup and metric definitions

use anyhow::Context;
use metrics::{describe_gauge, describe_histogram, describe_counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sqlx::PgPool;

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    // Seconds; sub-millisecond buckets for fast point lookups
    let buckets = vec![
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions so HELP/TYPE lines appear from startup.
pub fn describe_metrics() {
    describe_counter!(
        "branch_office_http_requests_total",
        "Total number of HTTP requests"
    );
    describe_histogram!(
        "branch_office_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "branch_office_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );
    describe_gauge!(
        "branch_office_db_pool_connections_active",
        "Number of active database connections"
    );
    describe_gauge!(
        "branch_office_db_pool_connections_idle",
        "Number of idle database connections"
    );

    gauge!("branch_office_http_requests_in_flight").set(0.0);
}

/// Snapshot connection pool usage into gauges
pub fn record_pool_stats(pool: &PgPool) {
    let size = pool.size() as f64;
    let idle = pool.num_idle() as f64;
    gauge!("branch_office_db_pool_connections_active").set((size - idle).max(0.0));
    gauge!("branch_office_db_pool_connections_idle").set(idle);
}
