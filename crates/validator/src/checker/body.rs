/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Request body checks: presence, media type, JSON decoding and schema.

use serde_json::Value;

use super::schema::violations;
use crate::document::RequestBody;
use crate::tree::{RequestPart, ValidationError};

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Check `body` against the operation's request body definition.
///
/// Operations without a request body accept anything.
pub fn check_body(
    definition: Option<&RequestBody>,
    body: Option<Vec<u8>>,
    content_type: Option<&str>,
) -> Option<ValidationError> {
    let definition = definition?;
    let wrap = |inner| ValidationError::request(RequestPart::Body, inner);

    let body = match body {
        Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => bytes,
        _ if definition.required => return Some(wrap(ValidationError::MissingBody)),
        _ => return None,
    };

    let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);
    let Some(media) = definition.media_type_for(content_type) else {
        return Some(wrap(ValidationError::Other(format!(
            "header Content-Type has unexpected value '{content_type}'"
        ))));
    };

    if !media.is_json() {
        return None;
    }

    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => return Some(wrap(ValidationError::Parse { cause: e.to_string() })),
    };

    let schema = media.schema.as_ref()?;
    let fields: Vec<ValidationError> = violations(schema, &value)
        .into_iter()
        .map(ValidationError::FieldSchema)
        .collect();

    if fields.is_empty() {
        None
    } else {
        Some(wrap(ValidationError::Aggregate(fields)))
    }
}
