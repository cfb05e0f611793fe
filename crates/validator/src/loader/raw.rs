/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! Serde view of an OpenAPI 3 document after `$ref` inlining.
//!
//! Only the fields the validator consumes are modelled; everything else is ignored.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub type SecurityRequirements = Vec<BTreeMap<String, Vec<String>>>;

#[derive(Debug, Deserialize)]
pub struct RawSpec {
    pub openapi: Option<Value>,
    pub info: Option<RawInfo>,
    #[serde(default)]
    pub paths: BTreeMap<String, RawPathItem>,
    #[serde(default)]
    pub components: RawComponents,
    pub security: Option<SecurityRequirements>,
}

#[derive(Debug, Deserialize)]
pub struct RawInfo {
    pub title: Option<String>,
    pub version: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawComponents {
    #[serde(default)]
    pub schemas: BTreeMap<String, Value>,
    #[serde(default, rename = "securitySchemes")]
    pub security_schemes: BTreeMap<String, RawSecurityScheme>,
}

#[derive(Debug, Deserialize)]
pub struct RawSecurityScheme {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    #[serde(rename = "in")]
    pub location: Option<String>,
    pub scheme: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPathItem {
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
    pub get: Option<RawOperation>,
    pub put: Option<RawOperation>,
    pub post: Option<RawOperation>,
    pub delete: Option<RawOperation>,
    pub options: Option<RawOperation>,
    pub head: Option<RawOperation>,
    pub patch: Option<RawOperation>,
    pub trace: Option<RawOperation>,
}

impl RawPathItem {
    /// Defined operations keyed by upper-case HTTP method.
    pub fn operations(&self) -> Vec<(&'static str, &RawOperation)> {
        [
            ("GET", &self.get),
            ("PUT", &self.put),
            ("POST", &self.post),
            ("DELETE", &self.delete),
            ("OPTIONS", &self.options),
            ("HEAD", &self.head),
            ("PATCH", &self.patch),
            ("TRACE", &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
        .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct RawOperation {
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
    #[serde(rename = "requestBody")]
    pub request_body: Option<RawRequestBody>,
    pub responses: Option<BTreeMap<String, Value>>,
    pub security: Option<SecurityRequirements>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawRequestBody {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: BTreeMap<String, RawMediaType>,
}

#[derive(Debug, Deserialize)]
pub struct RawMediaType {
    pub schema: Option<Value>,
}
