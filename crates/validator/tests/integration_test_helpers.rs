//! Test helpers for integration tests

use delta_validator::{NormalizedError, RequestView, ValidationService};
use std::fs;
use std::path::PathBuf;

/// Path of the OpenAPI contract shipped at the repository root.
pub fn api_spec_path() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../apispec/api-spec.yml")
        .to_string_lossy()
        .to_string()
}

/// A service over the shipped contract.
pub fn shipped_service() -> ValidationService {
    ValidationService::new(api_spec_path())
}

/// Read a fixture file under `tests/fixtures`.
#[allow(dead_code)]
pub fn read_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

/// Parse a fixture holding an expected error array.
#[allow(dead_code)] // Only used by the fixture-driven suites
pub fn expected_errors(name: &str) -> Vec<NormalizedError> {
    serde_json::from_str(&read_fixture(name)).unwrap()
}

/// A JSON POST with the headers the gateway always sets.
pub fn json_post(path: &str, body: &str) -> RequestView {
    RequestView::new("POST", path)
        .with_header("Content-Type", "application/json")
        .with_header("X-Request-Id", "test-context")
        .with_body(body)
}

/// Value recorded for `field` at `location`, if such an error exists.
#[allow(dead_code)]
pub fn value_at<'a>(errors: &'a [NormalizedError], location: &str, field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|e| e.location == location)
        .and_then(|e| e.error_values.get(field))
        .map(String::as_str)
}
