use crate::dispatcher::Dispatcher;
use crate::envelope::CallEnvelope;
use crate::errors::{DispatchError, RelayError};
use http::header::{CONTENT_TYPE, HeaderValue};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use shared::http::{full_body, make_error_response, make_json_response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

type RelayResponse = Response<BoxBody<Bytes, RelayError>>;

/// Serves the relay's HTTP surface: `/api`, `/metrics`, `/null` and `/health`.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<Inner>,
}

struct Inner {
    dispatcher: Dispatcher,
    metrics: PrometheusHandle,
    max_body_bytes: usize,
}

impl RelayService {
    pub fn new(dispatcher: Dispatcher, metrics: PrometheusHandle, max_body_bytes: usize) -> Self {
        RelayService {
            inner: Arc::new(Inner {
                dispatcher,
                metrics,
                max_body_bytes,
            }),
        }
    }
}

impl Inner {
    async fn handle(&self, method: &Method, path: &str, body: Bytes) -> RelayResponse {
        match (path, method) {
            ("/api", &Method::POST) => self.handle_api(&body).await,
            ("/metrics", &Method::GET) => {
                let mut response = Response::new(full_body(self.metrics.render()));
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static(PROMETHEUS_CONTENT_TYPE));
                response
            }
            ("/null", &Method::POST) | ("/health", &Method::GET) => {
                make_json_response(StatusCode::OK, &json!({"message": "ok"}))
            }
            ("/api" | "/metrics" | "/null" | "/health", _) => {
                make_error_response(StatusCode::METHOD_NOT_ALLOWED)
            }
            _ => make_error_response(StatusCode::NOT_FOUND),
        }
    }

    async fn handle_api(&self, body: &[u8]) -> RelayResponse {
        let envelope = CallEnvelope::from_form(body);

        match self.dispatcher.dispatch(&envelope).await {
            Ok(()) => Response::new(full_body(Bytes::new())),
            Err(_) => make_json_response(
                StatusCode::BAD_REQUEST,
                &json!({"error": DispatchError::WIRE_MESSAGE}),
            ),
        }
    }
}

impl Service<Request<Incoming>> for RelayService {
    type Response = RelayResponse;
    type Error = RelayError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();

            let body = match Limited::new(body, inner.max_body_bytes).collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) if e.is::<LengthLimitError>() => {
                    tracing::warn!(path = parts.uri.path(), "Request body too large");
                    return Ok(make_error_response(StatusCode::PAYLOAD_TOO_LARGE));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Failed to read request body");
                    return Ok(make_error_response(StatusCode::BAD_REQUEST));
                }
            };

            Ok(inner.handle(&parts.method, parts.uri.path(), body).await)
        })
    }
}
