/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 *
 * Utility functions for parsing YAML and JSON documents and resolving file paths.
 */

use serde_json::Value;
use std::path::{Component, Path, PathBuf};

/// Parse YAML or JSON content from a string.
///
/// Detects format from the file extension, otherwise tries JSON first, then YAML.
pub fn parse_yaml_or_json(content: &str, file_path: &Path) -> Result<Value, String> {
    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("json") => parse_json(content),
        Some("yaml") | Some("yml") => parse_yaml(content),
        // Unknown extension: JSON is stricter, so try it first
        _ => parse_json(content).or_else(|_| parse_yaml(content)),
    }
}

fn parse_json(content: &str) -> Result<Value, String> {
    serde_json::from_str(content).map_err(|e| format!("JSON parse error: {e}"))
}

fn parse_yaml(content: &str) -> Result<Value, String> {
    let value: Value =
        serde_yaml::from_str(content).map_err(|e| format!("YAML parse error: {e}"))?;
    if value.is_null() {
        return Err("YAML document is empty".to_string());
    }
    Ok(value)
}

/// Turn a possibly relative path into an absolute one, anchored at the working directory.
///
/// The result is normalized lexically (`.` and `..` are folded) without touching the
/// filesystem, so it can be used as a stable cache key.
pub fn resolve_absolute(path: &str) -> Result<PathBuf, String> {
    if path.trim().is_empty() {
        return Err("path is empty".to_string());
    }
    let candidate = Path::new(path);
    let absolute = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| format!("unable to read working directory: {e}"))?
            .join(candidate)
    };
    Ok(normalize_path(&absolute))
}

/// Fold `.` and `..` components of a path.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_by_extension() {
        let result = parse_yaml_or_json(r#"{"openapi": "3.0.3"}"#, Path::new("spec.json")).unwrap();
        assert_eq!(result["openapi"], "3.0.3");
    }

    #[test]
    fn test_parse_yaml_by_extension() {
        let yaml = r#"
openapi: 3.0.3
info:
  title: Deltas
  version: "1"
"#;
        let result = parse_yaml_or_json(yaml, Path::new("spec.yml")).unwrap();
        assert_eq!(result["openapi"], "3.0.3");
        assert_eq!(result["info"]["title"], "Deltas");
    }

    #[test]
    fn test_parse_unknown_extension_falls_back_to_yaml() {
        let result = parse_yaml_or_json("key: value", Path::new("spec")).unwrap();
        assert_eq!(result["key"], "value");
    }

    #[test]
    fn test_parse_empty_yaml_is_error() {
        assert!(parse_yaml_or_json("", Path::new("spec.yaml")).is_err());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_yaml_or_json(r#"{"key": unclosed"#, Path::new("spec.json")).is_err());
    }

    #[test]
    fn test_normalize_path_folds_dots() {
        let path = normalize_path(Path::new("/a/b/./c/../d.yml"));
        assert_eq!(path, PathBuf::from("/a/b/d.yml"));
    }

    #[test]
    fn test_resolve_absolute_relative_path() {
        let resolved = resolve_absolute("apispec/api-spec.yml").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("apispec/api-spec.yml"));
    }

    #[test]
    fn test_resolve_absolute_empty_path() {
        assert!(resolve_absolute("  ").is_err());
    }
}
