/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */
use thiserror::Error;

/// Errors raised while loading an OpenAPI document from disk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Unable to resolve OpenAPI spec path '{path}': {reason}")]
    PathResolution { path: String, reason: String },

    #[error("Unable to parse OpenAPI spec '{path}': {reason}")]
    ParseFailure { path: String, reason: String },

    #[error("OpenAPI spec is invalid: {0}")]
    SchemaInvalid(String),
}

/// Errors raised when a request cannot be matched to an operation in the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No route found for {method} {path}")]
    NotFound { method: String, path: String },

    #[error("Method {method} is not defined for {template}")]
    MethodNotAllowed { method: String, template: String },
}

/// Operational failures of the validation service.
///
/// These never describe bad user input; a host maps them to a server error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("OpenAPI spec failed to load: {0}")]
    SpecLoadFailed(String),

    #[error("Route lookup failed: {0}")]
    RouteNotFound(#[from] RouteError),
}

/// Result alias used by the loader.
pub type LoadResult<T> = Result<T, LoadError>;
