/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Request checking against a matched operation.
//!
//! Security, parameters and body are checked in that order. Each failing part
//! contributes one `RequestError`, and all of them are returned in one aggregate.

mod body;
mod options;
mod params;
mod schema;
mod security;

pub use body::check_body;
pub use options::{AuthenticationMode, ValidationOptions};
pub use params::{check_parameters, coerce};
pub use schema::{split_pointer, violations};
pub use security::check_security;

use crate::request::RequestView;
use crate::router::MatchedRoute;
use crate::tree::ValidationError;

/// Check `request` against `route`.
///
/// The body is consumed from `request`.
pub fn check(
    route: &MatchedRoute<'_>,
    request: &mut RequestView,
    options: &ValidationOptions,
) -> Result<(), ValidationError> {
    let operation = route.operation;
    let mut errors = Vec::new();

    if options.authentication_mode == AuthenticationMode::RequireCredentials {
        errors.extend(check_security(&operation.security, request));
    }

    errors.extend(check_parameters(
        &operation.parameters,
        &route.path_params,
        request,
    ));

    let content_type = request.header("content-type").map(str::to_string);
    errors.extend(check_body(
        operation.request_body.as_ref(),
        request.take_body(),
        content_type.as_deref(),
    ));

    if errors.is_empty() {
        return Ok(());
    }

    if options.multi_error {
        Err(ValidationError::Aggregate(errors))
    } else {
        Err(first_leaf(errors.swap_remove(0)))
    }
}

/// Reduce a tree to its first leaf, keeping the request context around it.
fn first_leaf(error: ValidationError) -> ValidationError {
    match error {
        ValidationError::Aggregate(children) => match children.into_iter().next() {
            Some(child) => first_leaf(child),
            None => ValidationError::Aggregate(Vec::new()),
        },
        ValidationError::Request { part, inner } => ValidationError::request(part, first_leaf(*inner)),
        leaf => leaf,
    }
}
