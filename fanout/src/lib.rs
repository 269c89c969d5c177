//! Multiplexing relay for the fuzzing dashboard API.
//!
//! Every call received on `/api` is decoded, used to update the relay's
//! Prometheus metrics and then replayed, in configuration order, against each
//! configured forward target.

pub mod call;
pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod errors;
pub mod method;
pub mod metrics_defs;
pub mod registry;
pub mod service;

#[cfg(test)]
mod testutils;

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::errors::Result;
use crate::metrics_defs::ALL_METRICS;
use crate::registry::Registry;
use crate::service::RelayService;
use metrics_exporter_prometheus::PrometheusHandle;
use shared::http::run_http_service;
use shared::metrics_defs::describe_metrics;
use std::sync::Arc;

/// Serves the relay until the listener fails.
///
/// `metrics` must be the handle of the globally installed recorder, it backs
/// the `/metrics` endpoint.
pub async fn run(config: Config, metrics: PrometheusHandle) -> Result<()> {
    config.validate()?;
    describe_metrics(ALL_METRICS);

    let registry = Registry::from_config(&config)?;
    tracing::info!(targets = registry.len(), "Starting relay");

    let dispatcher = Dispatcher::new(Arc::new(registry));
    let service = RelayService::new(dispatcher, metrics, config.max_body_bytes);

    run_http_service(&config.listener.host, config.listener.port, service).await
}
