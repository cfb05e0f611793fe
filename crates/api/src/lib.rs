//! Delta API
//!
//! Copyright 2025 Release Workshop Ltd
//! Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
//! See the LICENSE file in the project root for details.
//!
//! HTTP ingestion gateway for deltas. Each endpoint validates the posted body with
//! [`delta_validator::ValidationService`] and publishes accepted deltas onto the topic
//! configured for their kind.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod publisher;
pub mod routes;
pub mod telemetry;

pub use app::{create_router, AppState};
pub use config::{Config, Topics};
pub use error::{ApiError, ApiResult, ConfigError, PublishError};
pub use publisher::{DeltaEnvelope, DeltaPublisher, RestProxyPublisher};
pub use routes::{DeltaRoute, TopicKey, DELTA_ROUTES};
