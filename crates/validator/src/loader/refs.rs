/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 *
 * `$ref` resolution. Local and file references are inlined so the rest of the
 * loader works on a single self-contained document.
 */

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{LoadError, LoadResult};
use crate::loader::utils::{normalize_path, parse_yaml_or_json};

const REF_KEY: &str = "$ref";

/// Resolves `$ref` entries across one root document and the files it references.
///
/// Parsed files are cached for the lifetime of the resolver; the resolver itself is
/// discarded once the document is built.
#[derive(Default)]
pub struct RefResolver {
    files: HashMap<PathBuf, Rc<Value>>,
}

impl RefResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `root` and return it with every reference inlined.
    pub fn resolve_root(&mut self, root: &Path) -> LoadResult<Value> {
        let document = self.load_file(root)?;
        let mut stack = Vec::new();
        self.resolve_value(&document, root, &mut stack)
    }

    /// Number of distinct files read so far.
    pub fn files_loaded(&self) -> usize {
        self.files.len()
    }

    fn load_file(&mut self, path: &Path) -> LoadResult<Rc<Value>> {
        if let Some(cached) = self.files.get(path) {
            return Ok(Rc::clone(cached));
        }

        let content = fs::read_to_string(path).map_err(|e| LoadError::ParseFailure {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let value = parse_yaml_or_json(&content, path).map_err(|reason| LoadError::ParseFailure {
            path: path.display().to_string(),
            reason,
        })?;

        let value = Rc::new(value);
        self.files.insert(path.to_path_buf(), Rc::clone(&value));
        Ok(value)
    }

    fn resolve_value(
        &mut self,
        value: &Value,
        current_file: &Path,
        stack: &mut Vec<String>,
    ) -> LoadResult<Value> {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get(REF_KEY) {
                    return self.resolve_reference(reference, current_file, stack);
                }
                let mut resolved = Map::with_capacity(map.len());
                for (key, child) in map {
                    resolved.insert(key.clone(), self.resolve_value(child, current_file, stack)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_value(item, current_file, stack))
                .collect::<LoadResult<Vec<_>>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn resolve_reference(
        &mut self,
        reference: &str,
        current_file: &Path,
        stack: &mut Vec<String>,
    ) -> LoadResult<Value> {
        let (target_file, pointer) = split_reference(reference, current_file)?;
        let key = format!("{}#{}", target_file.display(), pointer);
        if stack.contains(&key) {
            return Err(LoadError::SchemaInvalid(format!(
                "circular reference detected at '{reference}'"
            )));
        }

        let document = self.load_file(&target_file)?;
        let target = document.pointer(&pointer).cloned().ok_or_else(|| {
            LoadError::SchemaInvalid(format!(
                "unable to resolve reference '{reference}' in {}",
                target_file.display()
            ))
        })?;

        stack.push(key);
        let resolved = self.resolve_value(&target, &target_file, stack);
        stack.pop();
        resolved
    }
}

/// Split a reference into the file that holds it and a JSON pointer into that file.
fn split_reference(reference: &str, current_file: &Path) -> LoadResult<(PathBuf, String)> {
    let (document, fragment) = match reference.split_once('#') {
        Some((document, fragment)) => (document, fragment),
        None => (reference, ""),
    };

    if document.contains("://") {
        return Err(LoadError::SchemaInvalid(format!(
            "remote reference '{reference}' is not supported"
        )));
    }

    let pointer = match fragment {
        "" | "/" => String::new(),
        f if f.starts_with('/') => f.to_string(),
        _ => {
            return Err(LoadError::SchemaInvalid(format!(
                "reference '{reference}' must use a JSON pointer fragment"
            )))
        }
    };

    let target_file = if document.is_empty() {
        current_file.to_path_buf()
    } else {
        let base = current_file.parent().unwrap_or_else(|| Path::new("/"));
        normalize_path(&base.join(document))
    };

    Ok((target_file, pointer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_split_local_reference() {
        let (file, pointer) =
            split_reference("#/components/schemas/Officer", Path::new("/spec/api.yml")).unwrap();
        assert_eq!(file, PathBuf::from("/spec/api.yml"));
        assert_eq!(pointer, "/components/schemas/Officer");
    }

    #[test]
    fn test_split_relative_file_reference() {
        let (file, pointer) =
            split_reference("../schemas/officer.yml#/Officer", Path::new("/spec/v1/api.yml"))
                .unwrap();
        assert_eq!(file, PathBuf::from("/spec/schemas/officer.yml"));
        assert_eq!(pointer, "/Officer");
    }

    #[test]
    fn test_split_whole_file_reference() {
        let (file, pointer) = split_reference("address.json", Path::new("/spec/api.yml")).unwrap();
        assert_eq!(file, PathBuf::from("/spec/address.json"));
        assert_eq!(pointer, "");
    }

    #[test]
    fn test_split_remote_reference_rejected() {
        let result = split_reference("https://example.com/s.yml#/A", Path::new("/spec/api.yml"));
        assert!(matches!(result, Err(LoadError::SchemaInvalid(_))));
    }

    #[test]
    fn test_resolve_local_and_external_references() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "schemas/address.yml",
            "Address:\n  type: object\n  properties:\n    premise:\n      type: string\n",
        );
        let root = write(
            &dir,
            "api.yml",
            r##"
components:
  schemas:
    Officer:
      type: object
      properties:
        address:
          $ref: "schemas/address.yml#/Address"
body:
  $ref: "#/components/schemas/Officer"
"##,
        );

        let mut resolver = RefResolver::new();
        let resolved = resolver.resolve_root(&root).unwrap();
        assert_eq!(
            resolved["body"]["properties"]["address"],
            json!({"type": "object", "properties": {"premise": {"type": "string"}}})
        );
        assert_eq!(resolver.files_loaded(), 2);
    }

    #[test]
    fn test_escaped_pointer_segments() {
        let dir = TempDir::new().unwrap();
        let root = write(
            &dir,
            "api.json",
            r##"{"paths": {"/delta/officers": {"x": 1}}, "copy": {"$ref": "#/paths/~1delta~1officers"}}"##,
        );
        let resolved = RefResolver::new().resolve_root(&root).unwrap();
        assert_eq!(resolved["copy"], json!({"x": 1}));
    }

    #[test]
    fn test_circular_reference_is_rejected() {
        let dir = TempDir::new().unwrap();
        let root = write(
            &dir,
            "api.yml",
            r##"
a:
  $ref: "#/b"
b:
  $ref: "#/a"
"##,
        );
        let result = RefResolver::new().resolve_root(&root);
        match result {
            Err(LoadError::SchemaInvalid(msg)) => assert!(msg.contains("circular")),
            other => panic!("Expected SchemaInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_unresolvable_reference() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "api.yml", "a:\n  $ref: \"#/missing\"\n");
        let result = RefResolver::new().resolve_root(&root);
        assert!(matches!(result, Err(LoadError::SchemaInvalid(_))));
    }

    #[test]
    fn test_missing_external_file() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "api.yml", "a:\n  $ref: \"nope.yml#/A\"\n");
        let result = RefResolver::new().resolve_root(&root);
        assert!(matches!(result, Err(LoadError::ParseFailure { .. })));
    }
}
