//! Logging middleware
//!
//! Request tracing for the HTTP API. Every request runs inside a span that
//! carries a correlation id, taken from the `X-Correlation-ID` header when the
//! client sends a valid UUID and generated otherwise.

use axum::http::{HeaderMap, Request};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Correlation id from the request headers, or a fresh one
pub fn correlation_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CorrelatedMakeSpan;

impl<B> MakeSpan<B> for CorrelatedMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            correlation_id = %correlation_id(request.headers()),
        )
    }
}

/// HTTP trace layer with per-request correlation ids
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, CorrelatedMakeSpan> {
    TraceLayer::new_for_http().make_span_with(CorrelatedMakeSpan)
}
