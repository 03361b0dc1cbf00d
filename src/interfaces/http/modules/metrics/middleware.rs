//! HTTP request metrics middleware
//!
//! - `http_requests_total{method, path, status}` counter
//! - `http_request_duration_seconds{method, path}` histogram
//! - `auth_logins_total{outcome}` counter, fed by the login handler
//!
//! `path` is the matched route template (`/api/members/{id}`), so member
//! ids and dates never become label values.

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

const UNMATCHED: &str = "unmatched";

pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED.to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();
    metrics::counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status)
        .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(duration);

    response
}

/// Count a login attempt as `success` or `failure`.
pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("auth_logins_total", "outcome" => outcome).increment(1);
}
