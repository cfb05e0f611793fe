/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Matching of request method and path to a documented operation.

use std::collections::BTreeMap;
use std::fmt;

use crate::document::{OpenApiDocument, Operation};
use crate::error::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// A path template such as `/delta/officers/{officer_id}`, split into segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template. Parameters must span a whole segment.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if !raw.starts_with('/') {
            return Err(format!("path '{raw}' must start with '/'"));
        }

        let mut segments = Vec::new();
        for part in split_segments(raw) {
            let opens = part.matches('{').count();
            let closes = part.matches('}').count();
            if opens == 0 && closes == 0 {
                segments.push(Segment::Literal(part.to_string()));
                continue;
            }
            match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(name) if opens == 1 && closes == 1 && !name.is_empty() => {
                    segments.push(Segment::Param(name.to_string()));
                }
                _ => return Err(format!("path '{raw}' has a malformed segment '{part}'")),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Match a concrete path, returning extracted parameters.
    pub fn captures(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.trim_start_matches('/').trim_end_matches('/');
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}

/// The operation a request resolved to, borrowed from the document.
#[derive(Debug)]
pub struct MatchedRoute<'a> {
    pub template: &'a PathTemplate,
    pub method: String,
    pub operation: &'a Operation,
    pub path_params: BTreeMap<String, String>,
}

/// Find the operation for `method` and `path`.
///
/// When several templates match, the one with the most literal segments wins.
/// A matching template without the requested method yields `MethodNotAllowed`.
pub fn match_route<'a>(
    document: &'a OpenApiDocument,
    method: &str,
    path: &str,
) -> Result<MatchedRoute<'a>, RouteError> {
    let method = method.to_ascii_uppercase();
    let path_only = path.split('?').next().unwrap_or_default();

    let mut candidates: Vec<_> = document
        .paths
        .iter()
        .filter_map(|entry| entry.template.captures(path_only).map(|p| (entry, p)))
        .collect();

    if candidates.is_empty() {
        return Err(RouteError::NotFound {
            method,
            path: path.to_string(),
        });
    }

    candidates.sort_by_key(|(entry, _)| std::cmp::Reverse(entry.template.literal_count()));

    for (entry, params) in &candidates {
        if let Some(operation) = entry.operations.get(&method) {
            return Ok(MatchedRoute {
                template: &entry.template,
                method,
                operation,
                path_params: params.clone(),
            });
        }
    }

    Err(RouteError::MethodNotAllowed {
        method,
        template: candidates[0].0.template.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Info, PathEntry};
    use std::path::PathBuf;

    fn operation(id: &str) -> Operation {
        Operation {
            operation_id: Some(id.to_string()),
            parameters: Vec::new(),
            request_body: None,
            security: Vec::new(),
        }
    }

    fn entry(template: &str, methods: &[(&str, &str)]) -> PathEntry {
        PathEntry {
            template: PathTemplate::parse(template).unwrap(),
            operations: methods
                .iter()
                .map(|(m, id)| (m.to_string(), operation(id)))
                .collect(),
        }
    }

    fn document(paths: Vec<PathEntry>) -> OpenApiDocument {
        OpenApiDocument::new(
            "3.0.3".to_string(),
            Info {
                title: "test".to_string(),
                version: "1".to_string(),
            },
            paths,
            PathBuf::from("/tmp/api.yml"),
        )
    }

    #[test]
    fn test_parse_template_segments() {
        let template = PathTemplate::parse("/delta/officers/{officer_id}").unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("delta".to_string()),
                Segment::Literal("officers".to_string()),
                Segment::Param("officer_id".to_string()),
            ]
        );
        assert_eq!(template.param_names().collect::<Vec<_>>(), vec!["officer_id"]);
    }

    #[test]
    fn test_parse_rejects_partial_parameter_segments() {
        assert!(PathTemplate::parse("/delta/off{id}").is_err());
        assert!(PathTemplate::parse("/delta/{}").is_err());
        assert!(PathTemplate::parse("delta").is_err());
    }

    #[test]
    fn test_root_template() {
        let template = PathTemplate::parse("/").unwrap();
        assert!(template.segments().is_empty());
        assert!(template.captures("/").is_some());
        assert!(template.captures("/delta").is_none());
    }

    #[test]
    fn test_match_extracts_path_params() {
        let doc = document(vec![entry("/delta/charges/{charge_id}", &[("POST", "charge")])]);
        let matched = match_route(&doc, "post", "/delta/charges/ABC123").unwrap();
        assert_eq!(matched.method, "POST");
        assert_eq!(matched.path_params.get("charge_id").unwrap(), "ABC123");
        assert_eq!(matched.operation.operation_id.as_deref(), Some("charge"));
    }

    #[test]
    fn test_literal_template_wins() {
        let doc = document(vec![
            entry("/delta/officers/{id}", &[("POST", "by_id")]),
            entry("/delta/officers/validate", &[("POST", "validate")]),
        ]);
        let matched = match_route(&doc, "POST", "/delta/officers/validate").unwrap();
        assert_eq!(matched.operation.operation_id.as_deref(), Some("validate"));
        assert!(matched.path_params.is_empty());
    }

    #[test]
    fn test_trailing_slash_and_query_are_ignored() {
        let doc = document(vec![entry("/delta/officers", &[("POST", "officers")])]);
        assert!(match_route(&doc, "POST", "/delta/officers/").is_ok());
        assert!(match_route(&doc, "POST", "/delta/officers?x=1").is_ok());
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let doc = document(vec![entry("/delta/officers", &[("POST", "officers")])]);
        let result = match_route(&doc, "POST", "/delta/unknown");
        assert_eq!(
            result.unwrap_err(),
            RouteError::NotFound {
                method: "POST".to_string(),
                path: "/delta/unknown".to_string()
            }
        );
    }

    #[test]
    fn test_undefined_method_is_method_not_allowed() {
        let doc = document(vec![entry("/delta/officers", &[("POST", "officers")])]);
        let result = match_route(&doc, "GET", "/delta/officers");
        assert_eq!(
            result.unwrap_err(),
            RouteError::MethodNotAllowed {
                method: "GET".to_string(),
                template: "/delta/officers".to_string()
            }
        );
    }

    #[test]
    fn test_method_falls_through_to_less_specific_template() {
        let doc = document(vec![
            entry("/delta/officers/{id}", &[("GET", "get_one")]),
            entry("/delta/officers/validate", &[("POST", "validate")]),
        ]);
        let matched = match_route(&doc, "GET", "/delta/officers/validate").unwrap();
        assert_eq!(matched.operation.operation_id.as_deref(), Some("get_one"));
        assert_eq!(matched.path_params.get("id").unwrap(), "validate");
    }
}
