/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Structural self-checks of a parsed OpenAPI document.
//!
//! Every problem is collected so a broken document is reported in one pass.

use serde_json::Value;

use crate::document::ParameterLocation;
use crate::loader::raw::{RawOperation, RawParameter, RawPathItem, RawSpec, SecurityRequirements};
use crate::router::PathTemplate;

/// Return every structural problem found in `spec`.
pub fn check(spec: &RawSpec) -> Vec<String> {
    let mut problems = Vec::new();

    check_version(spec.openapi.as_ref(), &mut problems);

    match &spec.info {
        Some(info) => {
            if info.title.as_deref().map_or(true, str::is_empty) {
                problems.push("info.title is required".to_string());
            }
            if info.version.as_ref().map_or(true, Value::is_null) {
                problems.push("info.version is required".to_string());
            }
        }
        None => problems.push("info is required".to_string()),
    }

    if spec.paths.is_empty() {
        problems.push("at least one path must be defined".to_string());
    }

    if let Some(security) = &spec.security {
        check_security_references(spec, security, "document", &mut problems);
    }

    for (path, item) in &spec.paths {
        check_path_item(spec, path, item, &mut problems);
    }

    problems
}

fn check_version(openapi: Option<&Value>, problems: &mut Vec<String>) {
    let version = match openapi {
        Some(Value::String(v)) => v.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            problems.push("openapi must be a version string".to_string());
            return;
        }
        None => {
            problems.push("openapi version field is required".to_string());
            return;
        }
    };

    if !version.starts_with("3.") {
        problems.push(format!("unsupported openapi version '{version}', expected 3.x"));
    }
}

fn check_path_item(spec: &RawSpec, path: &str, item: &RawPathItem, problems: &mut Vec<String>) {
    let template = match PathTemplate::parse(path) {
        Ok(template) => template,
        Err(reason) => {
            problems.push(reason);
            return;
        }
    };

    check_parameters(path, &item.parameters, problems);

    let operations = item.operations();
    if operations.is_empty() {
        problems.push(format!("path '{path}' defines no operations"));
    }

    for (method, operation) in operations {
        let context = format!("{method} {path}");
        check_operation(spec, &context, operation, problems);

        for name in template.param_names() {
            let declared = item
                .parameters
                .iter()
                .chain(operation.parameters.iter())
                .any(|p| p.name == name && p.location == "path");
            if !declared {
                problems.push(format!(
                    "{context}: path parameter '{name}' is not declared"
                ));
            }
        }
    }
}

fn check_operation(
    spec: &RawSpec,
    context: &str,
    operation: &RawOperation,
    problems: &mut Vec<String>,
) {
    check_parameters(context, &operation.parameters, problems);

    if operation.responses.as_ref().map_or(true, |r| r.is_empty()) {
        problems.push(format!("{context}: at least one response must be defined"));
    }

    if let Some(body) = &operation.request_body {
        if body.content.is_empty() {
            problems.push(format!("{context}: request body declares no media types"));
        }
    }

    if let Some(security) = &operation.security {
        check_security_references(spec, security, context, problems);
    }
}

fn check_parameters(context: &str, parameters: &[RawParameter], problems: &mut Vec<String>) {
    for parameter in parameters {
        match ParameterLocation::parse(&parameter.location) {
            Some(ParameterLocation::Path) if !parameter.required => problems.push(format!(
                "{context}: path parameter '{}' must be required",
                parameter.name
            )),
            Some(_) => {}
            None => problems.push(format!(
                "{context}: parameter '{}' has unknown location '{}'",
                parameter.name, parameter.location
            )),
        }
    }
}

fn check_security_references(
    spec: &RawSpec,
    requirements: &SecurityRequirements,
    context: &str,
    problems: &mut Vec<String>,
) {
    for name in requirements.iter().flat_map(|r| r.keys()) {
        if !spec.components.security_schemes.contains_key(name) {
            problems.push(format!("{context}: unknown security scheme '{name}'"));
        }
    }
}
