//! Router assembly.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use axum::routing::{get, post};
use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use delta_validator::ValidationService;

use crate::config::Topics;
use crate::error::ConfigError;
use crate::handlers::{handle_delta, healthcheck, PrimaryIdMatcher};
use crate::middleware::{context_id, request_logger, ContextId};
use crate::publisher::DeltaPublisher;
use crate::routes::{DeltaRoute, DELTA_ROUTES, HEALTHCHECK_PATH};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<ValidationService>,
    pub publisher: Arc<dyn DeltaPublisher>,
    pub topics: Arc<Topics>,
}

impl AppState {
    pub fn new(
        validator: Arc<ValidationService>,
        publisher: Arc<dyn DeltaPublisher>,
        topics: Topics,
    ) -> Self {
        Self {
            validator,
            publisher,
            topics: Arc::new(topics),
        }
    }
}

/// Build the router for every delta endpoint plus the healthcheck.
pub fn create_router(state: AppState) -> Result<Router, ConfigError> {
    create_router_for(state, DELTA_ROUTES)
}

pub fn create_router_for(
    state: AppState,
    routes: &'static [DeltaRoute],
) -> Result<Router, ConfigError> {
    let mut router = Router::new();

    for route in routes {
        let matcher = route
            .primary_id
            .map(PrimaryIdMatcher::new)
            .transpose()?
            .map(Arc::new);

        router = router.route(
            route.path,
            post(
                move |state: State<AppState>,
                      Extension(context): Extension<ContextId>,
                      uri: Uri,
                      headers: HeaderMap,
                      body: Bytes| {
                    handle_delta(route, matcher, state, context, uri, headers, body)
                },
            ),
        );
    }

    Ok(router
        .layer(axum::middleware::from_fn(context_id))
        .route(HEALTHCHECK_PATH, get(healthcheck))
        .layer(axum::middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
