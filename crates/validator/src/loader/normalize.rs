/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Rewrites OpenAPI 3.0 schema dialect into plain JSON Schema before compilation.

use serde_json::{Map, Value};

/// Rewrite every `nullable: true` into a `type` union with `"null"`.
///
/// Schemas without a `type` are wrapped in `anyOf` with a null schema. Enumerations
/// gain a `null` member so the enum check does not reject the value the union allows.
pub fn normalize_nullable(value: &mut Value) {
    if let Value::Object(map) = value {
        if let Some(replacement) = apply_nullable_flag(map) {
            *value = replacement;
        }
    }

    match value {
        Value::Object(map) => map.values_mut().for_each(normalize_nullable),
        Value::Array(items) => items.iter_mut().for_each(normalize_nullable),
        _ => {}
    }
}

fn apply_nullable_flag(map: &mut Map<String, Value>) -> Option<Value> {
    match map.get("nullable") {
        Some(Value::Bool(true)) => {
            map.remove("nullable");
        }
        Some(Value::Bool(false)) => {
            map.remove("nullable");
            return None;
        }
        _ => return None,
    }

    if let Some(Value::Array(variants)) = map.get_mut("enum") {
        if !variants.iter().any(Value::is_null) {
            variants.push(Value::Null);
        }
    }

    match map.get_mut("type") {
        Some(Value::String(single)) => {
            let single = std::mem::take(single);
            map.insert(
                "type".to_string(),
                Value::Array(vec![Value::String(single), Value::String("null".to_string())]),
            );
            None
        }
        Some(Value::Array(types)) => {
            if !types.iter().any(|t| t.as_str() == Some("null")) {
                types.push(Value::String("null".to_string()));
            }
            None
        }
        _ => {
            let inner = Value::Object(std::mem::take(map));
            let mut null_schema = Map::new();
            null_schema.insert("type".to_string(), Value::String("null".to_string()));
            let mut wrapper = Map::new();
            wrapper.insert(
                "anyOf".to_string(),
                Value::Array(vec![inner, Value::Object(null_schema)]),
            );
            Some(Value::Object(wrapper))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nullable_string_becomes_union() {
        let mut schema = json!({"type": "string", "nullable": true, "maxLength": 3});
        normalize_nullable(&mut schema);
        assert_eq!(schema, json!({"type": ["string", "null"], "maxLength": 3}));
    }

    #[test]
    fn test_nullable_false_is_dropped() {
        let mut schema = json!({"type": "integer", "nullable": false});
        normalize_nullable(&mut schema);
        assert_eq!(schema, json!({"type": "integer"}));
    }

    #[test]
    fn test_nullable_enum_accepts_null() {
        let mut schema = json!({"type": "string", "enum": ["a", "b"], "nullable": true});
        normalize_nullable(&mut schema);
        assert_eq!(schema["enum"], json!(["a", "b", null]));
    }

    #[test]
    fn test_nullable_without_type_wraps_any_of() {
        let mut schema = json!({"nullable": true, "minLength": 1});
        normalize_nullable(&mut schema);
        assert_eq!(
            schema,
            json!({"anyOf": [{"minLength": 1}, {"type": "null"}]})
        );
    }

    #[test]
    fn test_nested_properties_are_normalized() {
        let mut schema = json!({
            "type": "object",
            "properties": {
                "resigned_on": {"type": "string", "nullable": true},
                "items": {"type": "array", "items": {"type": "integer", "nullable": true}}
            }
        });
        normalize_nullable(&mut schema);
        assert_eq!(
            schema["properties"]["resigned_on"]["type"],
            json!(["string", "null"])
        );
        assert_eq!(
            schema["properties"]["items"]["items"]["type"],
            json!(["integer", "null"])
        );
    }

    #[test]
    fn test_property_named_nullable_is_untouched() {
        let mut schema = json!({
            "type": "object",
            "properties": {"nullable": {"type": "boolean"}}
        });
        let expected = schema.clone();
        normalize_nullable(&mut schema);
        assert_eq!(schema, expected);
    }
}
