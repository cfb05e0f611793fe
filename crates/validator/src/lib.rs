//! Delta Validator Library
//!
//! Copyright 2025 Release Workshop Ltd
//! Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
//! See the LICENSE file in the project root for details.
//!
//! Validates inbound delta requests against an OpenAPI 3 contract and reshapes every
//! violation into the client-facing error array. It has no HTTP framework dependency:
//! hosts describe a request with [`RequestView`] and map the outcome to a status code.
//!
//! # Example
//!
//! ```rust,no_run
//! use delta_validator::{RequestView, ValidationService};
//!
//! let service = ValidationService::new("apispec/api-spec.yml");
//! let request = RequestView::new("POST", "/delta/officers")
//!     .with_header("Content-Type", "application/json")
//!     .with_body(r#"{"officers": []}"#);
//!
//! match service.validate(request, "context-123")? {
//!     None => println!("valid"),
//!     Some(payload) => println!("{}", String::from_utf8_lossy(&payload.to_json())),
//! }
//! # Ok::<(), delta_validator::InternalError>(())
//! ```

pub mod checker;
pub mod document;
pub mod error;
pub mod loader;
pub mod normalizer;
pub mod request;
pub mod router;
pub mod service;
pub mod tree;

pub use checker::{check, AuthenticationMode, ValidationOptions};
pub use document::OpenApiDocument;
pub use error::{InternalError, LoadError, RouteError};
pub use loader::load;
pub use normalizer::{flatten, same_locations, to_json, NormalizedError};
pub use request::RequestView;
pub use router::{match_route, MatchedRoute};
pub use service::{DocumentSource, ErrorPayload, FileSource, ValidationService};
pub use tree::{FieldSchemaError, RequestPart, ValidationError};

/// Result alias for validation service calls.
pub type ValidatorResult<T> = Result<T, InternalError>;
