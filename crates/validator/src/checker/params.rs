/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Path, query and header parameter checks.

use serde_json::Value;
use std::collections::BTreeMap;

use super::schema::violations;
use crate::document::{CompiledSchema, Parameter, ParameterLocation};
use crate::request::RequestView;
use crate::tree::{FieldSchemaError, RequestPart, ValidationError};

/// Check every declared parameter, one `RequestError` per failing parameter.
pub fn check_parameters(
    parameters: &[Parameter],
    path_params: &BTreeMap<String, String>,
    request: &RequestView,
) -> Vec<ValidationError> {
    parameters
        .iter()
        .filter_map(|parameter| check_parameter(parameter, path_params, request))
        .collect()
}

fn check_parameter(
    parameter: &Parameter,
    path_params: &BTreeMap<String, String>,
    request: &RequestView,
) -> Option<ValidationError> {
    let part = RequestPart::Parameter {
        name: parameter.name.clone(),
        location: parameter.location,
    };

    let raw: Vec<&str> = match parameter.location {
        ParameterLocation::Path => path_params
            .get(&parameter.name)
            .map(|v| vec![v.as_str()])
            .unwrap_or_default(),
        ParameterLocation::Query => request.query_all(&parameter.name),
        ParameterLocation::Header => request.header(&parameter.name).into_iter().collect(),
        // Cookies are not inspected.
        ParameterLocation::Cookie => return None,
    };

    if raw.is_empty() {
        if !parameter.required {
            return None;
        }
        let missing = FieldSchemaError {
            pointer: vec![parameter.name.clone()],
            reason: format!("parameter '{}' is required but missing", parameter.name),
            constraint: "required".to_string(),
            value: None,
        };
        return Some(ValidationError::request(
            part,
            ValidationError::FieldSchema(missing),
        ));
    }

    let schema = parameter.schema.as_ref()?;
    let value = coerce(schema, &raw);
    let errors: Vec<ValidationError> = violations(schema, &value)
        .into_iter()
        .map(|mut error| {
            error.pointer.insert(0, parameter.name.clone());
            ValidationError::FieldSchema(error)
        })
        .collect();

    match errors.len() {
        0 => None,
        1 => errors
            .into_iter()
            .next()
            .map(|inner| ValidationError::request(part, inner)),
        _ => Some(ValidationError::request(
            part,
            ValidationError::Aggregate(errors),
        )),
    }
}

/// Convert raw parameter strings into the JSON type the schema expects.
///
/// Values that do not parse are left as strings so the schema reports the mismatch.
/// No values coerce to an empty array, or to `null` for scalar schemas.
pub fn coerce(schema: &CompiledSchema, raw: &[&str]) -> Value {
    let Some(&first) = raw.first() else {
        return match schema.primitive_type() {
            Some("array") => Value::Array(Vec::new()),
            _ => Value::Null,
        };
    };
    match schema.primitive_type() {
        Some("array") => {
            let item_type = schema.item_type();
            let items: Vec<&str> = if raw.len() == 1 {
                first.split(',').collect()
            } else {
                raw.to_vec()
            };
            Value::Array(items.into_iter().map(|item| coerce_scalar(item_type, item)).collect())
        }
        other => coerce_scalar(other, first),
    }
}

fn coerce_scalar(kind: Option<&str>, raw: &str) -> Value {
    let parsed = match kind {
        Some("integer") => raw.parse::<i64>().ok().map(Value::from),
        Some("number") => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        Some("boolean") => raw.parse::<bool>().ok().map(Value::Bool),
        _ => None,
    };
    parsed.unwrap_or_else(|| Value::String(raw.to_string()))
}
