//! Request span handling on top of OpenTelemetry.
//!
//! # Responsibilities
//! - Own the tracer provider for the process lifetime
//! - Start one server span per inbound request
//! - Give handlers a span handle whose operations are no-ops when tracing is off
//! - Continue the caller's trace when the request carries `traceparent`
//!
//! # Design Decisions
//! - The span is passed explicitly (`&mut RequestSpan`), never looked up globally
//! - No exporter is configured here; callers that want export build their own
//!   `SdkTracerProvider` and hand it to `Telemetry::from_provider`

use axum::http::{HeaderMap, Method};
use opentelemetry::trace::{
    Span as _, SpanKind, Status, TraceContextExt, Tracer as _, TracerProvider as _,
};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider, Span};
use opentelemetry_sdk::Resource;

use crate::config::ObservabilityConfig;
use crate::observability::propagation;

/// Instrumentation scope name for every span this service creates.
pub const TRACER_NAME: &str = "todo-proxy";

/// Matched route template.
pub const HTTP_ROUTE: &str = "http.route";
/// Number of todos returned by the list route.
pub const APP_TODO_COUNT: &str = "app.todo_count";
/// Requested todo id on the detail route.
pub const APP_TODO_ID: &str = "app.todo_id";
/// Inbound request method.
pub const HTTP_REQUEST_METHOD: &str = "http.request.method";
/// Inbound request path.
pub const URL_PATH: &str = "url.path";

/// Errors from tracer provider lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("tracer provider shutdown failed: {reason}")]
    Shutdown { reason: String },
}

/// Holds the tracer provider and the tracer derived from it.
#[derive(Debug, Clone)]
pub struct Telemetry {
    provider: SdkTracerProvider,
    tracer: SdkTracer,
}

impl Telemetry {
    /// Wrap an externally built provider (e.g. one with an exporter attached).
    pub fn from_provider(provider: SdkTracerProvider) -> Self {
        let tracer = provider.tracer(TRACER_NAME);
        Self { provider, tracer }
    }

    pub fn tracer(&self) -> &SdkTracer {
        &self.tracer
    }

    pub fn provider(&self) -> &SdkTracerProvider {
        &self.provider
    }

    /// Flush and shut down the provider.
    pub fn shutdown(&self) -> Result<(), TelemetryError> {
        self.provider
            .shutdown()
            .map_err(|e| TelemetryError::Shutdown {
                reason: e.to_string(),
            })
    }
}

/// Build the process tracer provider, or `None` when tracing is disabled.
pub fn init_tracer(config: &ObservabilityConfig) -> Option<Telemetry> {
    if !config.tracing_enabled {
        tracing::info!("Request tracing disabled");
        return None;
    }

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();

    let provider = SdkTracerProvider::builder().with_resource(resource).build();

    tracing::info!(service_name = %config.service_name, "Request tracing enabled");
    Some(Telemetry::from_provider(provider))
}

/// A possibly absent span for one request.
///
/// Every method silently does nothing when no span is attached.
#[derive(Debug, Default)]
pub struct RequestSpan {
    inner: Option<Span>,
}

impl RequestSpan {
    /// A handle with no span attached.
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// Start a server span for an inbound request as a child of `parent`.
    pub fn start(tracer: &SdkTracer, parent: &Context, method: &Method, path: &str) -> Self {
        let span = tracer
            .span_builder(method.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(vec![
                KeyValue::new(HTTP_REQUEST_METHOD, method.to_string()),
                KeyValue::new(URL_PATH, path.to_string()),
            ])
            .start_with_context(tracer, parent);

        Self { inner: Some(span) }
    }

    /// Start a span when a tracer is available, parented on any trace
    /// context found in `headers`.
    pub fn maybe_start(
        tracer: Option<&SdkTracer>,
        headers: &HeaderMap,
        method: &Method,
        path: &str,
    ) -> Self {
        match tracer {
            Some(tracer) => {
                let parent = propagation::extract_context(headers);
                Self::start(tracer, &parent, method, path)
            }
            None => Self::none(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.inner.is_some()
    }

    pub fn update_name(&mut self, name: &'static str) {
        if let Some(span) = self.inner.as_mut() {
            span.update_name(name);
        }
    }

    pub fn set_attribute(&mut self, attribute: KeyValue) {
        if let Some(span) = self.inner.as_mut() {
            span.set_attribute(attribute);
        }
    }

    /// Headers that carry this span's context to the upstream.
    ///
    /// Empty when no span is attached.
    pub fn trace_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(span) = self.inner.as_ref() {
            let cx = Context::new().with_remote_span_context(span.span_context().clone());
            propagation::inject_context(&cx, &mut headers);
        }
        headers
    }

    /// Mark the span as failed without recording an exception.
    pub fn set_error_status(&mut self, message: impl Into<String>) {
        if let Some(span) = self.inner.as_mut() {
            span.set_status(Status::error(message.into()));
        }
    }

    /// Record `err` as an exception event and mark the span as failed.
    pub fn record_failure(&mut self, err: &dyn std::error::Error) {
        if let Some(span) = self.inner.as_mut() {
            span.record_error(err);
            span.set_status(Status::error(err.to_string()));
        }
    }

    /// End the span now rather than on drop.
    pub fn end(mut self) {
        if let Some(mut span) = self.inner.take() {
            span.end();
        }
    }
}
