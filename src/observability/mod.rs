//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (one OpenTelemetry span per request)
//!     → propagation.rs (traceparent in from callers, out to upstream)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//!     → span exporter attached to the tracer provider (external)
//! ```

pub mod logging;
pub mod metrics;
pub mod propagation;
pub mod tracing;

pub use self::tracing::{init_tracer, RequestSpan, Telemetry, TelemetryError};
