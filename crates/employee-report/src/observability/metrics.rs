//! Prometheus metrics for the employee report service

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::Result;
use crate::error::Error;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static START_TIME: OnceLock<Instant> = OnceLock::new();

// Server metrics
const METRIC_UPTIME: &str = "employee_report_uptime_seconds";
const METRIC_INFO: &str = "employee_report_info";
const METRIC_REQUESTS: &str = "employee_report_requests_total";

// Fetch metrics
const METRIC_FETCH_DURATION: &str = "employee_report_fetch_duration_seconds";
const METRIC_FETCH_ERRORS: &str = "employee_report_fetch_errors_total";
const METRIC_RECORDS: &str = "employee_report_records_returned_total";

/// Initialize Prometheus metrics recorder.
pub fn init_metrics() -> Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| Error::Config(format!("Failed to install metrics recorder: {e}")))?;

    PROMETHEUS_HANDLE.set(handle).ok();
    START_TIME.set(Instant::now()).ok();

    register_metrics();
    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

fn register_metrics() {
    describe_gauge!(METRIC_UPTIME, "Server uptime in seconds");
    describe_gauge!(METRIC_INFO, "Server information (always 1)");
    describe_counter!(METRIC_REQUESTS, "Total HTTP requests by route and status");

    describe_histogram!(
        METRIC_FETCH_DURATION,
        "Time spent fetching records from a backing store"
    );
    describe_counter!(METRIC_FETCH_ERRORS, "Total backing store failures");
    describe_counter!(METRIC_RECORDS, "Total masked records returned");

    gauge!(
        METRIC_INFO,
        "version" => env!("CARGO_PKG_VERSION"),
    )
    .set(1.0);
}

/// Render metrics in Prometheus text format.
#[must_use]
pub fn render_metrics() -> String {
    if let Some(start) = START_TIME.get() {
        gauge!(METRIC_UPTIME).set(start.elapsed().as_secs_f64());
    }

    PROMETHEUS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

/// Record a handled HTTP request.
pub fn record_request(route: &str, status: u16) {
    counter!(
        METRIC_REQUESTS,
        "route" => route.to_owned(),
        "status" => status.to_string(),
    )
    .increment(1);
}

/// Record a successful fetch from `source`.
pub fn record_fetch(source: &str, duration: Duration, records: u64) {
    histogram!(METRIC_FETCH_DURATION, "source" => source.to_owned())
        .record(duration.as_secs_f64());
    counter!(METRIC_RECORDS, "source" => source.to_owned()).increment(records);
}

/// Record a failed fetch from `source`.
pub fn record_fetch_error(source: &str, error_type: &str) {
    counter!(
        METRIC_FETCH_ERRORS,
        "source" => source.to_owned(),
        "error_type" => error_type.to_owned(),
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_metrics_without_init() {
        let output = render_metrics();
        assert!(output.is_empty());
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_request("/employees", 200);
        record_fetch("sqlite", Duration::from_millis(3), 2);
        record_fetch_error("document_store", "upstream");
    }
}
