//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a single dispatching handler
//! - Wire up middleware (request ID, access tracing, timeout)
//! - Match routes, invoke handlers, turn handler errors into 500s
//! - Annotate the request span and record metrics
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Response,
    Router as AxumRouter,
};
use opentelemetry_sdk::trace::SdkTracer;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::request::{self, propagate_request_id_layer, set_request_id_layer};
use crate::http::response;
use crate::observability::metrics;
use crate::observability::{RequestSpan, Telemetry};
use crate::routing::{Route, Router};
use crate::todos;
use crate::upstream::{TodoClient, UpstreamResult};

/// Span status message for unmatched paths.
pub const ROUTE_NOT_FOUND: &str = "Route not found";

/// Application state injected into the dispatcher.
///
/// Read-only after construction; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub client: TodoClient,
    pub tracer: Option<SdkTracer>,
}

impl AppState {
    pub fn new(config: &AppConfig, telemetry: Option<&Telemetry>) -> UpstreamResult<Self> {
        Ok(Self {
            router: Arc::new(Router::new()),
            client: TodoClient::new(&config.upstream)?,
            tracer: telemetry.map(|t| t.tracer().clone()),
        })
    }
}

/// HTTP server for the todo proxy.
pub struct HttpServer {
    router: AxumRouter,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server. Pass `None` to run without request spans.
    pub fn new(config: AppConfig, telemetry: Option<&Telemetry>) -> UpstreamResult<Self> {
        let state = AppState::new(&config, telemetry)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> AxumRouter {
        AxumRouter::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %request::request_id(req),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The configured Axum router, for embedding or in-process testing.
    pub fn router(&self) -> AxumRouter {
        self.router.clone()
    }

    /// Run the server until the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Entry point for every request.
async fn dispatch_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = request::request_id(&req).to_string();

    let mut span = RequestSpan::maybe_start(state.tracer.as_ref(), req.headers(), &method, &path);

    let route = state.router.match_path(&path);
    let route_label = route.as_ref().map(Route::template).unwrap_or("unmatched");

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route_label,
        "Dispatching request"
    );

    let response = match route {
        Some(route) => invoke(&state, route, &mut span, &request_id).await,
        None => {
            tracing::debug!(request_id = %request_id, path = %path, "No route matched");
            span.set_error_status(ROUTE_NOT_FOUND);
            response::not_found()
        }
    };

    span.end();
    metrics::record_request(method.as_str(), response.status().as_u16(), route_label, start);
    response
}

/// Run the matched handler; any error it returns becomes a 500.
async fn invoke(state: &AppState, route: Route, span: &mut RequestSpan, request_id: &str) -> Response {
    let result = match &route {
        Route::ListTodos => todos::list_todos(&state.client, span).await,
        Route::TodoDetail { id } => todos::get_todo(&state.client, id, span).await,
    };

    match result {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(
                request_id = %request_id,
                route = route.template(),
                error = %err,
                "Request Error"
            );
            span.record_failure(&err);
            metrics::record_upstream_error(err.kind());
            response::internal_error()
        }
    }
}
