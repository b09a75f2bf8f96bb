use ::metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the global Prometheus recorder. Safe to call more than once; only
/// the first call installs.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Prometheus recorder already installed"),
    }
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

pub fn record_qr_generation(outcome: &'static str) {
    counter!("topup_qr_generated_total", "outcome" => outcome).increment(1);
}

pub fn record_status_check(outcome: &'static str) {
    counter!("topup_status_checks_total", "outcome" => outcome).increment(1);
}

pub fn record_poll_finished(outcome: &'static str) {
    counter!("topup_polls_finished_total", "outcome" => outcome).increment(1);
}
