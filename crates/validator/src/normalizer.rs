/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Flattening of the error tree into the client-facing error array.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

use crate::tree::{FieldSchemaError, ValidationError};

pub const LOCATION_TYPE: &str = "json-path";
pub const ERROR_TYPE: &str = "ch:validation";
pub const REQUEST_BODY_LOCATION: &str = "request-body";
pub const UNKNOWN: &str = "unknown";
pub const MISSING_BODY_MESSAGE: &str = "request body has an error: value is required but missing";

/// One entry of the error array returned to clients.
///
/// Field names are the wire format other services depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub error: String,
    pub error_values: BTreeMap<String, String>,
    pub location: String,
    pub location_type: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl NormalizedError {
    fn new(error: String, error_values: BTreeMap<String, String>, location: String) -> Self {
        Self {
            error,
            error_values,
            location,
            location_type: LOCATION_TYPE.to_string(),
            error_type: ERROR_TYPE.to_string(),
        }
    }
}

/// Flatten `error` depth-first, one record per leaf, in walk order.
pub fn flatten(error: &ValidationError) -> Vec<NormalizedError> {
    let mut out = Vec::new();
    walk(error, &mut out);
    out
}

fn walk(error: &ValidationError, out: &mut Vec<NormalizedError>) {
    match error {
        ValidationError::Aggregate(children) => {
            for child in children {
                walk(child, out);
            }
        }
        ValidationError::Request { inner, .. } => walk(inner, out),
        ValidationError::FieldSchema(field) => out.push(from_field(field)),
        ValidationError::Parse { cause } => out.push(NormalizedError::new(
            cause.clone(),
            BTreeMap::new(),
            REQUEST_BODY_LOCATION.to_string(),
        )),
        ValidationError::MissingBody => out.push(NormalizedError::new(
            MISSING_BODY_MESSAGE.to_string(),
            BTreeMap::new(),
            REQUEST_BODY_LOCATION.to_string(),
        )),
        ValidationError::Security { scheme, reason } => {
            info!(scheme = %scheme, reason = %reason, "Ignoring security error during validation");
        }
        other => out.push(NormalizedError::new(
            other.to_string(),
            BTreeMap::new(),
            UNKNOWN.to_string(),
        )),
    }
}

fn from_field(field: &FieldSchemaError) -> NormalizedError {
    let (location, field_name) = match field.pointer.last() {
        Some(last) => (field.pointer.join("."), last.clone()),
        None => (REQUEST_BODY_LOCATION.to_string(), UNKNOWN.to_string()),
    };

    let supplied = if field.constraint == "required" {
        String::new()
    } else {
        field.value.as_ref().map(stringify).unwrap_or_default()
    };

    NormalizedError::new(
        field.reason.replace('"', "'"),
        BTreeMap::from([(field_name, supplied)]),
        location,
    )
}

/// Render a supplied value the way clients expect to read it back.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serialize the error array into its JSON wire form.
pub fn to_json(errors: &[NormalizedError]) -> Vec<u8> {
    // A Vec of plain string fields always serializes.
    serde_json::to_vec(errors).unwrap_or_else(|_| b"[]".to_vec())
}

/// Compatibility comparison used by fixture tests: two arrays match when they hold
/// the same multiset of locations. Messages and values are not compared.
pub fn same_locations(actual: &[NormalizedError], expected: &[NormalizedError]) -> bool {
    if actual.len() != expected.len() {
        return false;
    }
    let mut actual: Vec<&str> = actual.iter().map(|e| e.location.as_str()).collect();
    let mut expected: Vec<&str> = expected.iter().map(|e| e.location.as_str()).collect();
    actual.sort_unstable();
    expected.sort_unstable();
    actual == expected
}
