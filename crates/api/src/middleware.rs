//! Request middleware: correlation ids and access logging.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id of the current request, available as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextId(pub String);

impl ContextId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Take the correlation id from `X-Request-Id`, generating one when the caller sent none.
pub async fn context_id(mut req: Request<Body>, next: Next) -> Response {
    let supplied = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let id = match supplied {
        Some(id) => id,
        None => {
            let generated = Uuid::new_v4().to_string();
            error!(
                context_id = %generated,
                uri = %req.uri(),
                "X-Request-Id header missing, generated a context id"
            );
            generated
        }
    };

    req.extensions_mut().insert(ContextId(id));
    next.run(req).await
}

pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let elapsed = start.elapsed().as_millis();
    info!(
        "{} {} {} {}ms",
        method,
        uri,
        response.status().as_u16(),
        elapsed
    );
    response
}
