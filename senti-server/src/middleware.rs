//! Request tracing middleware.

use axum::{extract::Request, middleware::Next, response::Response};
use senti_common::logging::RequestContext;
use std::time::Instant;
use tracing::Instrument;

use crate::SERVICE_NAME;

/// Attach a trace ID span to every request and echo the IDs in the response.
pub async fn trace_middleware(request: Request, next: Next) -> Response {
    let ctx = RequestContext::from_headers(request.headers(), SERVICE_NAME);
    let span = tracing::info_span!(
        "http_request",
        trace_id = %ctx.trace_id,
        span_id = %ctx.span_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let start = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );
    });

    ctx.to_headers(response.headers_mut());
    response
}
