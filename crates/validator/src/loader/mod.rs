/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Loading of OpenAPI documents from disk.
//!
//! `load` resolves the path, inlines every `$ref`, rewrites OpenAPI 3.0 schema
//! dialect, checks the document structure and compiles every schema. The result is
//! immutable; the loader keeps no state between calls.

mod normalize;
mod raw;
mod refs;
mod structure;
pub mod utils;

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::document::{
    CompiledSchema, Info, MediaType, NamedSecurityScheme, OpenApiDocument, Operation, Parameter,
    ParameterLocation, PathEntry, RequestBody, SecurityScheme,
};
use crate::error::{LoadError, LoadResult};
use crate::router::PathTemplate;

pub use normalize::normalize_nullable;
use raw::{RawOperation, RawParameter, RawSecurityScheme, RawSpec};
pub use refs::RefResolver;
use utils::resolve_absolute;

/// Load, dereference and structurally validate the OpenAPI document at `path`.
pub fn load(path: &str) -> LoadResult<OpenApiDocument> {
    let absolute = resolve_absolute(path).map_err(|reason| LoadError::PathResolution {
        path: path.to_string(),
        reason,
    })?;

    info!(path = %absolute.display(), "Loading OpenAPI spec");

    let mut resolver = RefResolver::new();
    let mut resolved = resolver.resolve_root(&absolute)?;
    debug!(files = resolver.files_loaded(), "Resolved OpenAPI references");

    normalize_nullable(&mut resolved);

    let spec: RawSpec = serde_json::from_value(resolved)
        .map_err(|e| LoadError::SchemaInvalid(format!("unexpected document shape: {e}")))?;

    let mut problems = structure::check(&spec);
    let document = build_document(spec, absolute, &mut problems);

    if !problems.is_empty() {
        return Err(LoadError::SchemaInvalid(problems.join("; ")));
    }

    info!(
        title = %document.info.title,
        version = %document.info.version,
        operations = document.operation_count(),
        "OpenAPI spec loaded"
    );
    Ok(document)
}

/// Build the document model, appending schema compilation problems to `problems`.
///
/// The returned document is only meaningful when `problems` is empty.
fn build_document(spec: RawSpec, source: PathBuf, problems: &mut Vec<String>) -> OpenApiDocument {
    for (name, schema) in &spec.components.schemas {
        if let Err(reason) = CompiledSchema::compile(schema.clone()) {
            problems.push(format!("components.schemas.{name}: {reason}"));
        }
    }

    let schemes: BTreeMap<String, SecurityScheme> = spec
        .components
        .security_schemes
        .iter()
        .map(|(name, raw)| (name.clone(), security_scheme(raw)))
        .collect();

    let mut paths = Vec::with_capacity(spec.paths.len());
    for (path, item) in &spec.paths {
        // Structure problems for this template are already recorded.
        let Ok(template) = PathTemplate::parse(path) else {
            continue;
        };

        let mut operations = BTreeMap::new();
        for (method, raw_operation) in item.operations() {
            let context = format!("{method} {path}");
            let parameters = merge_parameters(&item.parameters, &raw_operation.parameters);
            let security = raw_operation
                .security
                .as_ref()
                .or(spec.security.as_ref())
                .map(|requirements| resolve_security(requirements, &schemes))
                .unwrap_or_default();

            let operation = build_operation(&context, raw_operation, parameters, security, problems);
            operations.insert(method.to_string(), operation);
        }

        paths.push(PathEntry {
            template,
            operations,
        });
    }

    let info = spec
        .info
        .map(|info| Info {
            title: info.title.unwrap_or_default(),
            version: match info.version {
                Some(Value::String(v)) => v,
                Some(other) => other.to_string(),
                None => String::new(),
            },
        })
        .unwrap_or_else(|| Info {
            title: String::new(),
            version: String::new(),
        });

    let openapi = match spec.openapi {
        Some(Value::String(v)) => v,
        Some(other) => other.to_string(),
        None => String::new(),
    };

    OpenApiDocument::new(openapi, info, paths, source)
}

fn build_operation(
    context: &str,
    raw: &RawOperation,
    parameters: Vec<RawParameter>,
    security: Vec<NamedSecurityScheme>,
    problems: &mut Vec<String>,
) -> Operation {
    let parameters = parameters
        .into_iter()
        .filter_map(|p| {
            let location = ParameterLocation::parse(&p.location)?;
            let schema = compile_optional(
                p.schema,
                &format!("{context} parameter '{}'", p.name),
                problems,
            );
            Some(Parameter {
                name: p.name,
                location,
                required: p.required,
                schema,
            })
        })
        .collect();

    let request_body = raw.request_body.as_ref().map(|body| RequestBody {
        required: body.required,
        content: body
            .content
            .iter()
            .map(|(media_type, media)| MediaType {
                media_type: media_type.clone(),
                schema: compile_optional(
                    media.schema.clone(),
                    &format!("{context} body '{media_type}'"),
                    problems,
                ),
            })
            .collect(),
    });

    Operation {
        operation_id: raw.operation_id.clone(),
        parameters,
        request_body,
        security,
    }
}

fn compile_optional(
    schema: Option<Value>,
    context: &str,
    problems: &mut Vec<String>,
) -> Option<CompiledSchema> {
    match CompiledSchema::compile(schema?) {
        Ok(compiled) => Some(compiled),
        Err(reason) => {
            problems.push(format!("{context}: schema does not compile: {reason}"));
            None
        }
    }
}

/// Operation parameters override path-item parameters with the same name and location.
fn merge_parameters(path_level: &[RawParameter], operation_level: &[RawParameter]) -> Vec<RawParameter> {
    let mut merged: Vec<RawParameter> = path_level
        .iter()
        .filter(|p| {
            !operation_level
                .iter()
                .any(|o| o.name == p.name && o.location == p.location)
        })
        .cloned()
        .collect();
    merged.extend(operation_level.iter().cloned());
    merged
}

fn security_scheme(raw: &RawSecurityScheme) -> SecurityScheme {
    match (raw.kind.as_str(), raw.location.as_deref(), raw.name.as_deref()) {
        ("apiKey", Some("header"), Some(header)) => SecurityScheme::ApiKeyHeader {
            header: header.to_ascii_lowercase(),
        },
        ("http", _, _) => SecurityScheme::Http {
            scheme: raw.scheme.clone().unwrap_or_default().to_ascii_lowercase(),
        },
        (kind, _, _) => SecurityScheme::Unsupported {
            kind: kind.to_string(),
        },
    }
}

fn resolve_security(
    requirements: &raw::SecurityRequirements,
    schemes: &BTreeMap<String, SecurityScheme>,
) -> Vec<NamedSecurityScheme> {
    let mut resolved: Vec<NamedSecurityScheme> = Vec::new();
    for name in requirements.iter().flat_map(|r| r.keys()) {
        if resolved.iter().any(|s| &s.name == name) {
            continue;
        }
        if let Some(scheme) = schemes.get(name) {
            resolved.push(NamedSecurityScheme {
                name: name.clone(),
                scheme: scheme.clone(),
            });
        }
    }
    resolved
}
