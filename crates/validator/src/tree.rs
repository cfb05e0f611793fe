/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! The error tree produced by request checking.
//!
//! Nodes nest arbitrarily: an aggregate holds request errors, which in turn wrap
//! aggregates of field violations. The normalizer flattens the tree.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::document::ParameterLocation;

/// Which part of the request an error belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Body,
    Parameter {
        name: String,
        location: ParameterLocation,
    },
}

impl fmt::Display for RequestPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => f.write_str("request body"),
            Self::Parameter { name, location } => write!(f, "{location} parameter '{name}'"),
        }
    }
}

/// One schema violation at a JSON pointer inside the checked value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchemaError {
    /// Unescaped pointer segments; empty for the document root.
    pub pointer: Vec<String>,
    pub reason: String,
    /// Name of the violated keyword, such as `required` or `maxLength`.
    pub constraint: String,
    /// The supplied value; `None` when the violation is an absence.
    pub value: Option<Value>,
}

impl fmt::Display for FieldSchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer.is_empty() {
            write!(f, "{}", self.reason)
        } else {
            write!(f, "{} at '/{}'", self.reason, self.pointer.join("/"))
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{} validation errors", .0.len())]
    Aggregate(Vec<ValidationError>),

    #[error("{part} is invalid: {inner}")]
    Request {
        part: RequestPart,
        inner: Box<ValidationError>,
    },

    #[error("{0}")]
    FieldSchema(FieldSchemaError),

    #[error("request body has an error: failed to decode request body: {cause}")]
    Parse { cause: String },

    #[error("request body has an error: value is required but missing")]
    MissingBody,

    #[error("security requirement '{scheme}' failed: {reason}")]
    Security { scheme: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl ValidationError {
    pub fn request(part: RequestPart, inner: ValidationError) -> Self {
        Self::Request {
            part,
            inner: Box::new(inner),
        }
    }

    /// Number of leaves below this node, the node itself when it is a leaf.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Aggregate(children) => children.iter().map(Self::leaf_count).sum(),
            Self::Request { inner, .. } => inner.leaf_count(),
            _ => 1,
        }
    }
}
