//! W3C Trace Context propagation over HTTP headers.
//!
//! Inbound `traceparent`/`tracestate` make the request span a child of the
//! caller's trace; without them the request span is a trace root. Outbound
//! upstream calls carry the request span's context the same way.
//!
//! `axum::http::HeaderMap` and `reqwest::header::HeaderMap` are the same type,
//! so one pair of adapters serves both directions.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;

/// Read-only view of request headers for the propagator.
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    /// Missing or non-UTF-8 headers read as absent.
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.to_str().ok()
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Writable view of outbound headers for the propagator.
pub struct HeaderInjector<'a>(pub &'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    /// Invalid names or values are skipped.
    fn set(&mut self, key: &str, value: String) {
        if let Ok(name) = HeaderName::from_bytes(key.as_bytes()) {
            if let Ok(val) = HeaderValue::from_str(&value) {
                self.0.insert(name, val);
            }
        }
    }
}

/// Parent context carried by inbound headers.
///
/// An absent or malformed `traceparent` yields a context with no remote
/// parent.
pub fn extract_context(headers: &HeaderMap) -> Context {
    TraceContextPropagator::new().extract(&HeaderExtractor(headers))
}

/// Write `cx`'s span context into `headers`.
///
/// Nothing is written when `cx` carries no valid span context.
pub fn inject_context(cx: &Context, headers: &mut HeaderMap) {
    TraceContextPropagator::new().inject_context(cx, &mut HeaderInjector(headers));
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{SpanId, TraceContextExt, TraceId};

    const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    #[test]
    fn test_extract_valid_traceparent() {
        let mut headers = HeaderMap::new();
        headers.insert("traceparent", HeaderValue::from_static(TRACEPARENT));
        headers.insert("tracestate", HeaderValue::from_static("vendor=abc"));

        let cx = extract_context(&headers);
        let span = cx.span();
        let sc = span.span_context();

        assert!(sc.is_valid());
        assert!(sc.is_remote());
        assert_eq!(
            sc.trace_id(),
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap()
        );
        assert_eq!(sc.span_id(), SpanId::from_hex("00f067aa0ba902b7").unwrap());
        assert_eq!(sc.trace_state().get("vendor"), Some("abc"));
    }

    #[test]
    fn test_missing_or_malformed_traceparent_has_no_parent() {
        let cx = extract_context(&HeaderMap::new());
        assert!(!cx.span().span_context().is_valid());

        let mut headers = HeaderMap::new();
        headers.insert("traceparent", HeaderValue::from_static("not-a-traceparent"));
        let cx = extract_context(&headers);
        assert!(!cx.span().span_context().is_valid());
    }

    #[test]
    fn test_inject_writes_traceparent() {
        let mut inbound = HeaderMap::new();
        inbound.insert("traceparent", HeaderValue::from_static(TRACEPARENT));
        let cx = extract_context(&inbound);

        let mut outbound = HeaderMap::new();
        inject_context(&cx, &mut outbound);
        assert_eq!(outbound["traceparent"], TRACEPARENT);
    }

    #[test]
    fn test_inject_empty_context_writes_nothing() {
        let mut headers = HeaderMap::new();
        inject_context(&Context::new(), &mut headers);
        assert!(headers.get("traceparent").is_none());
    }
}
