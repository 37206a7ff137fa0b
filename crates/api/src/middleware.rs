use std::time::Instant;

use axum::{
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, info, info_span};

use crate::context::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request logging: one span per request, completion logged with status and latency.
///
/// Also exposes the request id to handlers (`Extension<RequestContext>`) and to clients
/// (`x-request-id` response header).
pub async fn request_logging(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let ctx = RequestContext::generate();
    let request_id = ctx.request_id();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    req.extensions_mut().insert(ctx);

    let span = info_span!("http_request", %request_id, %method, %path);
    let started = Instant::now();

    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_secs_f64() * 1000.0,
            "request completed"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
