//! Request tracing middleware.
//!
//! Propagates a trace ID through the request so log lines from one request
//! can be correlated across services.

use axum::{
    body::Body,
    http::{header::HeaderName, Extensions, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header name for the trace ID.
pub const TRACE_ID_HEADER: &str = "X-Trace-ID";

/// Trace ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct TraceId(pub String);

/// Middleware that extracts or generates a trace ID.
///
/// If the `X-Trace-ID` header is present, uses that value. Otherwise a new
/// UUID v4 is generated. The ID is stored in request extensions, echoed in
/// the response headers and attached to the request tracing span.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(TraceId(id.clone()));

    let span = tracing::info_span!(
        "request",
        trace_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let _guard = span.enter();
    let start = std::time::Instant::now();

    let mut response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    tracing::info!(
        trace_id = %id,
        status = status,
        duration_ms = duration_ms,
        "Request completed"
    );

    if let Ok(header_value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-trace-id"), header_value);
    }

    response
}

/// Extracts the trace ID from request extensions.
///
/// Returns the trace ID if present, or a placeholder if not.
#[allow(dead_code)] // Used by handlers to access the trace ID
pub fn get_trace_id(extensions: &Extensions) -> String {
    extensions
        .get::<TraceId>()
        .map(|t| t.0.clone())
        .unwrap_or_else(|| "unknown".to_string())
}
