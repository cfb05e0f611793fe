/*!
 * Copyright 2025 Release Workshop Ltd
 * Licensed under the Elastic License 2.0; you may not use this file except in compliance with the Elastic License 2.0.
 * See the LICENSE file in the project root for details.
 */

//! The validation service: one cached document, many concurrent validations.

use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, info_span};

use crate::checker::{check, ValidationOptions};
use crate::document::OpenApiDocument;
use crate::error::{InternalError, LoadError};
use crate::loader;
use crate::normalizer::{flatten, to_json, NormalizedError};
use crate::request::RequestView;
use crate::router::match_route;

/// Where the service obtains its document from.
pub trait DocumentSource: Send + Sync {
    fn load(&self) -> Result<OpenApiDocument, LoadError>;

    /// Human readable origin, used in log lines.
    fn describe(&self) -> String;
}

/// Loads the document from a file path with [`loader::load`].
#[derive(Debug, Clone)]
pub struct FileSource {
    path: String,
}

impl FileSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn load(&self) -> Result<OpenApiDocument, LoadError> {
        loader::load(&self.path)
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

/// Errors found in a request, ready to be sent back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPayload {
    errors: Vec<NormalizedError>,
}

impl ErrorPayload {
    pub fn new(errors: Vec<NormalizedError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[NormalizedError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self) -> Vec<u8> {
        to_json(&self.errors)
    }

    pub fn into_errors(self) -> Vec<NormalizedError> {
        self.errors
    }
}

type CachedDocument = Result<Arc<OpenApiDocument>, String>;

/// Validates requests against a lazily loaded OpenAPI document.
///
/// The document is loaded on first use, exactly once even under concurrent callers.
/// A failed load is cached too: every later call reports it until the process restarts.
pub struct ValidationService {
    source: Box<dyn DocumentSource>,
    options: ValidationOptions,
    document: OnceLock<CachedDocument>,
}

impl ValidationService {
    /// Service reading the document at `spec_path`, relative or absolute.
    pub fn new(spec_path: impl Into<String>) -> Self {
        Self::with_source(FileSource::new(spec_path))
    }

    pub fn with_source(source: impl DocumentSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            options: ValidationOptions::default(),
            document: OnceLock::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.document.get(), Some(Ok(_)))
    }

    /// The cached document, loading it on first call.
    pub fn document(&self) -> Result<Arc<OpenApiDocument>, InternalError> {
        self.document
            .get_or_init(|| {
                let origin = self.source.describe();
                match self.source.load() {
                    Ok(document) => {
                        info!(source = %origin, "OpenAPI spec cached");
                        Ok(Arc::new(document))
                    }
                    Err(e) => {
                        error!(source = %origin, error = %e, "Failed to load OpenAPI spec");
                        Err(e.to_string())
                    }
                }
            })
            .clone()
            .map_err(InternalError::SpecLoadFailed)
    }

    /// Drop the cached document so the next call loads it again.
    pub fn reset(&mut self) {
        self.document = OnceLock::new();
    }

    /// Validate `request`.
    ///
    /// `Ok(None)` means the request conforms. `Ok(Some(payload))` carries the client
    /// facing errors. `Err` is reserved for operational failures.
    pub fn validate(
        &self,
        mut request: RequestView,
        correlation_id: &str,
    ) -> Result<Option<ErrorPayload>, InternalError> {
        let span = info_span!("validate", context_id = %correlation_id);
        let _enter = span.enter();

        info!(method = %request.method(), path = %request.path(), "Validating request");

        let document = self.document().map_err(|e| {
            error!(error = %e, "Validation unavailable");
            e
        })?;

        let route = match_route(&document, request.method(), request.path()).map_err(|e| {
            error!(error = %e, "No route for request");
            InternalError::from(e)
        })?;
        debug!(template = %route.template, "Matched route");

        let result = match check(&route, &mut request, &self.options) {
            Ok(()) => None,
            Err(tree) => {
                let errors = flatten(&tree);
                (!errors.is_empty()).then(|| ErrorPayload::new(errors))
            }
        };

        match &result {
            Some(payload) => info!(errors = payload.len(), "Request failed validation"),
            None => info!("Request is valid"),
        }
        Ok(result)
    }
}
