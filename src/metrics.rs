use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Can only succeed once per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!(
            "extract_requests_total",
            "Extraction requests by outcome (ok, rejected, failed)."
        );
        describe_counter!(
            "extractor_failures_total",
            "Failed calls per extraction engine."
        );
        describe_counter!(
            "request_log_write_errors_total",
            "Request log entries that could not be written."
        );
        gauge!("process_start_ts").set(chrono::Utc::now().timestamp() as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
