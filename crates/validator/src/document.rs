/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Immutable in-memory model of a loaded OpenAPI document.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::router::PathTemplate;

/// A fully dereferenced OpenAPI document with every schema compiled.
#[derive(Debug)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub paths: Vec<PathEntry>,
    source: PathBuf,
}

impl OpenApiDocument {
    pub fn new(openapi: String, info: Info, paths: Vec<PathEntry>, source: PathBuf) -> Self {
        Self {
            openapi,
            info,
            paths,
            source,
        }
    }

    /// Absolute path of the root file the document was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn operation_count(&self) -> usize {
        self.paths.iter().map(|p| p.operations.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub title: String,
    pub version: String,
}

/// One path template and the operations defined on it.
#[derive(Debug)]
pub struct PathEntry {
    pub template: PathTemplate,
    /// Keyed by upper-case HTTP method.
    pub operations: BTreeMap<String, Operation>,
}

#[derive(Debug)]
pub struct Operation {
    pub operation_id: Option<String>,
    /// Path-item parameters merged with operation parameters; the latter win.
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    pub security: Vec<NamedSecurityScheme>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<CompiledSchema>,
}

#[derive(Debug)]
pub struct RequestBody {
    pub required: bool,
    pub content: Vec<MediaType>,
}

impl RequestBody {
    /// Find the declared media type for a `Content-Type` value, ignoring parameters.
    ///
    /// Wildcards are honoured in declared types (`application/*`, `*/*`).
    pub fn media_type_for(&self, content_type: &str) -> Option<&MediaType> {
        let wanted = essence(content_type);
        self.content
            .iter()
            .find(|m| essence(&m.media_type) == wanted)
            .or_else(|| {
                self.content
                    .iter()
                    .find(|m| wildcard_matches(&essence(&m.media_type), &wanted))
            })
    }
}

fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn wildcard_matches(declared: &str, wanted: &str) -> bool {
    match declared.split_once('/') {
        Some(("*", "*")) => true,
        Some((kind, "*")) => wanted.split_once('/').map(|(k, _)| k) == Some(kind),
        _ => false,
    }
}

#[derive(Debug)]
pub struct MediaType {
    pub media_type: String,
    pub schema: Option<CompiledSchema>,
}

impl MediaType {
    pub fn is_json(&self) -> bool {
        let essence = essence(&self.media_type);
        essence == "application/json" || essence.ends_with("+json")
    }
}

/// A JSON Schema compiled once at load time.
pub struct CompiledSchema {
    raw: Value,
    compiled: JSONSchema,
}

impl CompiledSchema {
    /// Compile with the draft OpenAPI 3.0 schemas are modelled on.
    pub fn compile(raw: Value) -> Result<Self, String> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft4)
            .compile(&raw)
            .map_err(|e| e.to_string())?;
        Ok(Self { raw, compiled })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn compiled(&self) -> &JSONSchema {
        &self.compiled
    }

    /// The first non-null primitive `type` the schema declares, if any.
    pub fn primitive_type(&self) -> Option<&str> {
        match self.raw.get("type")? {
            Value::String(t) => Some(t.as_str()),
            Value::Array(types) => types.iter().filter_map(Value::as_str).find(|t| *t != "null"),
            _ => None,
        }
    }

    /// Item type for array schemas.
    pub fn item_type(&self) -> Option<&str> {
        self.raw.get("items")?.get("type")?.as_str()
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

/// Security schemes the checker knows how to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityScheme {
    ApiKeyHeader { header: String },
    Http { scheme: String },
    Unsupported { kind: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSecurityScheme {
    pub name: String,
    pub scheme: SecurityScheme,
}
