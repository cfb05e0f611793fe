//! HTTP handlers for delta submission.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use regex::Regex;
use std::sync::Arc;
use tracing::{error, info};

use delta_validator::RequestView;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult, ConfigError};
use crate::middleware::ContextId;
use crate::routes::DeltaRoute;

/// Finds the value of a delta's identifying field in the raw body.
#[derive(Debug, Clone)]
pub struct PrimaryIdMatcher {
    field: &'static str,
    pattern: Regex,
}

impl PrimaryIdMatcher {
    pub fn new(field: &'static str) -> Result<Self, ConfigError> {
        let source = format!(r#""{}"\s*:\s*"([a-zA-Z0-9_-]+)""#, regex::escape(field));
        let pattern = Regex::new(&source).map_err(|e| {
            ConfigError::Invalid(format!("primary id pattern for '{}': {}", field, e))
        })?;
        Ok(Self { field, pattern })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn find<'a>(&self, body: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

pub async fn healthcheck() -> StatusCode {
    StatusCode::OK
}

/// Validate a delta and, unless the route only validates, publish it.
pub async fn handle_delta(
    route: &'static DeltaRoute,
    matcher: Option<Arc<PrimaryIdMatcher>>,
    State(state): State<AppState>,
    context: ContextId,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let context_id = context.0;
    info!(context_id = %context_id, path = route.path, "Starting delta process");

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(route.path);
    let mut request = RequestView::new("POST", path_and_query);
    for (name, value) in headers.iter() {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }
    let request = request.with_body(body.to_vec());

    let validator = Arc::clone(&state.validator);
    let validation_context = context_id.clone();
    let outcome = tokio::task::spawn_blocking(move || validator.validate(request, &validation_context))
        .await
        .map_err(|e| {
            error!(context_id = %context_id, error = %e, "Validation task failed");
            ApiError::Internal(e.to_string())
        })?;

    match outcome {
        Err(e) => {
            error!(context_id = %context_id, error = %e, "Error occurred while validating delta");
            return Err(ApiError::Internal(e.to_string()));
        }
        Ok(Some(payload)) => {
            info!(context_id = %context_id, errors = payload.len(), "Delta failed validation");
            return Err(ApiError::Validation(payload));
        }
        Ok(None) => {}
    }

    if route.validate_only {
        info!(context_id = %context_id, path = route.path, "Successfully validated delta");
        return Ok(StatusCode::OK);
    }

    let data = String::from_utf8_lossy(&body);
    if let Some(matcher) = &matcher {
        match matcher.find(&data) {
            Some(id) if route.is_delete => {
                info!(context_id = %context_id, field = matcher.field(), id = %id, "processing delete delta")
            }
            Some(id) => {
                info!(context_id = %context_id, field = matcher.field(), id = %id, "processing delta")
            }
            None => error!(
                context_id = %context_id,
                field = matcher.field(),
                "failed to match regex for primary id"
            ),
        }
    }

    let topic = state.topics.get(route.topic).ok_or_else(|| {
        error!(context_id = %context_id, topic = %route.topic, "No topic configured");
        ApiError::Internal(format!("no topic configured for {}", route.topic))
    })?;

    state
        .publisher
        .publish(topic, &data, &context_id, route.is_delete)
        .await
        .map_err(|e| {
            error!(context_id = %context_id, topic = %topic, error = %e, "Error publishing delta");
            ApiError::Internal(e.to_string())
        })?;

    info!(context_id = %context_id, topic = %topic, "Successfully processed delta");
    Ok(StatusCode::OK)
}
