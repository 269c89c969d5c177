use crate::config::MetricsConfig;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use metrics_exporter_statsd::{StatsdBuilder, StatsdError};
use metrics_util::MetricKindMask;
use metrics_util::layers::{Fanout, FanoutBuilder};
use std::time::Duration;

/// Counter series not updated for this long are dropped from `/metrics`.
///
/// `builds_total` and `job_done_total` carry per-build and per-job ids.
pub const COUNTER_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(thiserror::Error, Debug)]
pub enum MetricsError {
    #[error("could not create statsd recorder: {0}")]
    Statsd(#[from] StatsdError),
    #[error("a global metrics recorder is already installed")]
    AlreadyInstalled,
}

/// Builds the recorder for all relay metrics.
///
/// Prometheus always receives every metric, the returned handle renders it.
/// StatsD is added next to it when configured. Idle counters are evicted from
/// the Prometheus side after `counter_idle_timeout`, gauges are kept.
pub fn build_recorder(
    config: Option<&MetricsConfig>,
    counter_idle_timeout: Duration,
) -> Result<(Fanout, PrometheusHandle), MetricsError> {
    let prometheus = PrometheusBuilder::new()
        .idle_timeout(MetricKindMask::COUNTER, Some(counter_idle_timeout))
        .build_recorder();
    let handle = prometheus.handle();

    let mut builder = FanoutBuilder::default().add_recorder(prometheus);
    if let Some(config) = config {
        let statsd = StatsdBuilder::from(config.statsd_host.clone(), config.statsd_port)
            .build(config.prefix.as_deref())?;
        tracing::info!(host = %config.statsd_host, port = config.statsd_port, "Sending metrics to statsd");
        builder = builder.add_recorder(statsd);
    }

    Ok((builder.build(), handle))
}

pub fn init(config: Option<&MetricsConfig>) -> Result<PrometheusHandle, MetricsError> {
    let (recorder, handle) = build_recorder(config, COUNTER_IDLE_TIMEOUT)?;
    metrics::set_global_recorder(recorder).map_err(|_| MetricsError::AlreadyInstalled)?;
    Ok(handle)
}
