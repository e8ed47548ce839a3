//! W3C Trace Context propagation for outbound admin-API calls.
//!
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Header name for W3C traceparent
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Header name for W3C tracestate
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Header name for request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build trace headers for the current span.
///
/// Returns an empty map when no OpenTelemetry context is active.
pub fn trace_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    let context = Span::current().context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return headers;
    }

    // version-trace_id-span_id-trace_flags
    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );
    if let Ok(value) = HeaderValue::from_str(&traceparent) {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&tracestate) {
            headers.insert(TRACESTATE_HEADER, value);
        }
    }

    headers
}

/// Extension trait attaching trace context to a `reqwest::RequestBuilder`.
pub trait TracedRequestExt: Sized {
    /// Inject `traceparent`/`tracestate` from the current span.
    fn traced(self) -> Self;

    /// Inject trace context plus an `x-request-id` correlation header.
    fn traced_with_request_id(self, request_id: &str) -> Self;
}

impl TracedRequestExt for reqwest::RequestBuilder {
    fn traced(self) -> Self {
        self.headers(trace_headers())
    }

    fn traced_with_request_id(self, request_id: &str) -> Self {
        let mut headers = trace_headers();
        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert(REQUEST_ID_HEADER, value);
        }
        self.headers(headers)
    }
}
