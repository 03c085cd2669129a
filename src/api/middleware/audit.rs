//! Request audit logging.
//!
//! Logs every API request with method, path, response status and latency.
//! Client errors are logged at `warn`, server errors at `error`.

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        tracing::error!(%method, path, status, elapsed_ms, "API request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, path, status, elapsed_ms, "API request rejected");
    } else {
        tracing::info!(%method, path, status, elapsed_ms, "API request");
    }

    response
}
