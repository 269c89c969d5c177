use crate::call::Call;
use crate::envelope::CallEnvelope;
use crate::errors::DispatchError;
use crate::method::Method;
use crate::metrics_defs::{DOWNSTREAM_CALLS, REQUESTS};
use crate::registry::Registry;
use shared::counter;
use std::sync::Arc;

/// Label used for `requests_total` when the method name is not recognized.
const INVALID_METHOD_LABEL: &str = "invalid";

/// Decodes inbound calls and replays them against every registered dashboard.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Dispatcher { registry }
    }

    /// Handles one call end to end.
    ///
    /// Metrics derived from the payload are recorded before any dashboard is
    /// contacted, so they are kept even when the fan-out fails part way.
    pub async fn dispatch(&self, envelope: &CallEnvelope) -> Result<(), DispatchError> {
        tracing::info!(client = %envelope.client, method = %envelope.method, "Dispatching call");

        let method: Method = match envelope.method.parse() {
            Ok(method) => method,
            Err(e) => {
                counter!(REQUESTS, "client" => envelope.client.clone(), "method" => INVALID_METHOD_LABEL)
                    .increment(1);
                tracing::warn!(client = %envelope.client, error = %e, "Rejected call");
                return Err(e);
            }
        };

        let result = self.run(method, envelope.payload.as_deref()).await;

        counter!(REQUESTS, "client" => envelope.client.clone(), "method" => method.as_str())
            .increment(1);

        if let Err(e) = &result {
            match e {
                DispatchError::Downstream { target, .. } => {
                    tracing::warn!(%method, kind = e.kind(), forward_target = %target, error = %e, "Call failed")
                }
                _ => tracing::warn!(%method, kind = e.kind(), error = %e, "Call failed"),
            }
        }

        result
    }

    async fn run(&self, method: Method, payload: Option<&[u8]>) -> Result<(), DispatchError> {
        let call = Call::decode(method, payload)?;
        call.record_metrics();
        self.fan_out(&call).await
    }

    /// Invokes `call` on each dashboard in registry order.
    ///
    /// Stops at the first failure unless the call is best effort. Dashboards
    /// already called are not compensated.
    async fn fan_out(&self, call: &Call) -> Result<(), DispatchError> {
        let method = call.method().as_str();

        for (target, dashboard) in self.registry.iter() {
            let result = call.invoke(dashboard).await;

            let status = if result.is_ok() { "ok" } else { "error" };
            counter!(
                DOWNSTREAM_CALLS,
                "target" => target.to_string(),
                "method" => method,
                "status" => status,
            )
            .increment(1);

            if let Err(source) = result {
                if call.is_best_effort() {
                    tracing::warn!(forward_target = target, method, error = %source, "Best effort call failed, continuing");
                    continue;
                }
                return Err(DispatchError::Downstream {
                    target: target.to_string(),
                    source,
                });
            }
        }

        Ok(())
    }
}
