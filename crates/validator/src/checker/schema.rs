/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Conversion of `jsonschema` errors into field violations.

use jsonschema::error::ValidationErrorKind;
use serde_json::Value;

use crate::document::CompiledSchema;
use crate::tree::FieldSchemaError;

/// Run `schema` over `instance`, returning every violation in library order.
pub fn violations(schema: &CompiledSchema, instance: &Value) -> Vec<FieldSchemaError> {
    match schema.compiled().validate(instance) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|error| to_field_error(&error)).collect(),
    }
}

fn to_field_error(error: &jsonschema::ValidationError<'_>) -> FieldSchemaError {
    let mut pointer = split_pointer(&error.instance_path.to_string());
    let reason = error.to_string();

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            // Locate the error at the missing property itself.
            let name = match property {
                Value::String(name) => name.clone(),
                other => other.to_string(),
            };
            pointer.push(name);
            FieldSchemaError {
                pointer,
                reason,
                constraint: "required".to_string(),
                value: None,
            }
        }
        kind => FieldSchemaError {
            pointer,
            reason,
            constraint: constraint_name(kind).to_string(),
            value: Some(error.instance.clone().into_owned()),
        },
    }
}

/// The schema keyword that produced an error.
fn constraint_name(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
        ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
        ValidationErrorKind::AnyOf { .. } => "anyOf",
        ValidationErrorKind::Constant { .. } => "const",
        ValidationErrorKind::Contains { .. } => "contains",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
        ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
        ValidationErrorKind::Format { .. } => "format",
        ValidationErrorKind::MaxItems { .. } => "maxItems",
        ValidationErrorKind::Maximum { .. } => "maximum",
        ValidationErrorKind::MaxLength { .. } => "maxLength",
        ValidationErrorKind::MaxProperties { .. } => "maxProperties",
        ValidationErrorKind::MinItems { .. } => "minItems",
        ValidationErrorKind::Minimum { .. } => "minimum",
        ValidationErrorKind::MinLength { .. } => "minLength",
        ValidationErrorKind::MinProperties { .. } => "minProperties",
        ValidationErrorKind::MultipleOf { .. } => "multipleOf",
        ValidationErrorKind::Not { .. } => "not",
        ValidationErrorKind::OneOfMultipleValid { .. } => "oneOf",
        ValidationErrorKind::OneOfNotValid { .. } => "oneOf",
        ValidationErrorKind::Pattern { .. } => "pattern",
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::UniqueItems { .. } => "uniqueItems",
        _ => "schema",
    }
}

/// Split a rendered JSON pointer into unescaped segments.
pub fn split_pointer(pointer: &str) -> Vec<String> {
    if pointer.is_empty() || pointer == "/" {
        return Vec::new();
    }
    pointer
        .trim_start_matches('/')
        .split('/')
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}
