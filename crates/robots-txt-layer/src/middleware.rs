//! axum middleware intercepting `/robots.txt`
//!
//! The inner service's response is buffered in full, then replaced by a
//! single composed body. Every other path goes through untouched.

use crate::body::ComposedBody;
use crate::compose::RobotsTxt;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub const ROBOTS_TXT_PATH: &str = "/robots.txt";

/// Largest backend robots.txt body captured before giving up on it
const MAX_BACKEND_BODY_BYTES: usize = 1024 * 1024;

pub fn is_robots_txt_path(path: &str) -> bool {
    path.eq_ignore_ascii_case(ROBOTS_TXT_PATH)
}

/// Middleware for robots.txt augmentation.
///
/// Install with `axum::middleware::from_fn_with_state(robots, robots_txt_middleware)`.
/// A backend `304 Not Modified` is returned verbatim and a backend 404 becomes
/// a 200 carrying only the added rules. Range requests are answered with the
/// whole composed file.
pub async fn robots_txt_middleware(
    State(robots): State<Arc<RobotsTxt>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if !is_robots_txt_path(request.uri().path()) {
        return next.run(request).await;
    }

    let started = Instant::now();
    // HEAD must advertise the composed length, so the backend body is needed
    let is_head = request.method() == Method::HEAD;
    if is_head {
        *request.method_mut() = Method::GET;
    }
    request.headers_mut().remove(header::RANGE);
    request.headers_mut().remove(header::IF_RANGE);

    let response = next.run(request).await;
    let backend_status = response.status();

    if backend_status == StatusCode::NOT_MODIFIED {
        return response;
    }

    let (mut parts, body) = response.into_parts();

    let backend_body = match axum::body::to_bytes(body, MAX_BACKEND_BODY_BYTES).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            robots.record_error();
            warn!(error = %e, "Unable to read backend robots.txt body, treating it as empty");
            String::new()
        }
    };

    let composed = robots.compose(backend_status, &backend_body).await;

    if matches!(
        backend_status,
        StatusCode::NOT_FOUND | StatusCode::PARTIAL_CONTENT
    ) {
        parts.status = StatusCode::OK;
    }
    rewrite_headers(
        &mut parts.headers,
        composed.len(),
        robots.preserve_last_modified(),
    );

    if robots.metrics_enabled() {
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            backend_status = backend_status.as_u16(),
            bytes = composed.len(),
            "robots.txt request completed"
        );
    }

    // HEAD bodies are never polled
    let body = if is_head {
        Body::empty()
    } else {
        Body::new(ComposedBody::new(composed, robots.metrics_handle()))
    };

    Response::from_parts(parts, body)
}

/// Force plain text, set the composed length, drop range headers and, unless
/// kept, Last-Modified
fn rewrite_headers(headers: &mut HeaderMap, content_length: usize, preserve_last_modified: bool) {
    if !preserve_last_modified {
        headers.remove(header::LAST_MODIFIED);
    }
    headers.remove(header::CONTENT_RANGE);
    headers.remove(header::ACCEPT_RANGES);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
}
