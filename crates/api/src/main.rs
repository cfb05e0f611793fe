//! Delta API server
//!
//! Copyright 2025 Release Workshop Ltd
//! Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
//! See the LICENSE file in the project root for details.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use delta_api::{create_router, telemetry, AppState, Config, RestProxyPublisher};
use delta_validator::ValidationService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::parse();
    telemetry::init(config.log_json);

    if let Err(e) = config.validate() {
        error!(error = %e, "Configuration is incomplete");
        return Err(e.into());
    }
    let topics = config.topics()?;
    let addr = config.socket_addr()?;

    let spec_path = config.open_api_spec.clone().unwrap_or_default();
    let validator = Arc::new(ValidationService::new(spec_path.clone()));
    if let Err(e) = validator.document() {
        // Requests will keep failing with 500 until the spec is fixed and the service restarted.
        error!(spec = %spec_path, error = %e, "OpenAPI spec could not be loaded");
    }

    let registry = config.schema_registry_url.clone().unwrap_or_default();
    let publisher = RestProxyPublisher::init(config.brokers(), &registry)
        .await
        .context("Failed to initialise the delta publisher")?;

    let state = AppState::new(validator, Arc::new(publisher), topics);
    let router = create_router(state)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(address = %addr, "Delta API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Delta API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutting down gracefully...");
}
