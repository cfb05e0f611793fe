//! Integration tests for the shipped OpenAPI contract

mod integration_test_helpers;

use delta_validator::{load, same_locations};
use integration_test_helpers::*;

const DELTA_ENDPOINTS: &[&str] = &[
    "/delta/officers",
    "/delta/officers/validate",
    "/delta/insolvency",
    "/delta/charges",
    "/delta/charges/delete",
    "/delta/disqualification",
    "/delta/disqualification/delete",
    "/delta/company",
    "/delta/company/delete",
    "/delta/exemption",
    "/delta/psc-statement",
    "/delta/psc-statement/delete",
    "/delta/pscs",
    "/delta/filing-history",
    "/delta/filing-history/delete",
    "/delta/document-store",
    "/delta/registers",
    "/delta/registers/delete",
    "/delta/acsp",
];

#[test]
fn test_shipped_contract_loads() {
    let document = load(&api_spec_path()).unwrap();
    assert_eq!(document.info.title, "Delta API");
    assert_eq!(document.paths.len(), DELTA_ENDPOINTS.len());

    for endpoint in DELTA_ENDPOINTS {
        let entry = document
            .paths
            .iter()
            .find(|p| p.template.as_str() == *endpoint)
            .unwrap_or_else(|| panic!("{endpoint} is not documented"));
        let body = entry.operations["POST"].request_body.as_ref().unwrap();
        assert!(body.required, "{endpoint} should require a body");
    }
}

#[test]
fn test_every_endpoint_rejects_empty_object() {
    let service = shipped_service();
    for endpoint in DELTA_ENDPOINTS {
        let payload = service
            .validate(json_post(endpoint, "{}"), "contextId")
            .unwrap()
            .unwrap_or_else(|| panic!("{endpoint} accepted an empty object"));
        assert!(
            payload.errors().iter().any(|e| e.location == "delta_at"),
            "{endpoint}: {:?}",
            payload.errors()
        );
    }
}

#[test]
fn test_charges_delete_delta() {
    let service = shipped_service();
    let body = r#"{"charge_id": "ABCDE12345", "company_number": "09876543", "delta_at": "20240101120000000000"}"#;
    assert_eq!(
        service.validate(json_post("/delta/charges/delete", body), "contextId"),
        Ok(None)
    );

    let body = r#"{"charge_id": "ABCDE12345", "company_number": "0987", "delta_at": "20240101120000000000"}"#;
    let payload = service
        .validate(json_post("/delta/charges/delete", body), "contextId")
        .unwrap()
        .unwrap();
    // Too short and does not match the pattern.
    assert_eq!(payload.len(), 2);
    assert!(payload.errors().iter().all(|e| e.location == "company_number"));
}

#[test]
fn test_insolvency_integer_case_number() {
    let service = shipped_service();
    let body = r#"{
        "insolvency": [{
            "company_number": "09876543",
            "case_numbers": [{"case_number": "1", "case_type": "Moratorium", "mortgage_id": null}]
        }],
        "delta_at": "20240101120000000000"
    }"#;
    let payload = service
        .validate(json_post("/delta/insolvency", body), "contextId")
        .unwrap()
        .unwrap();
    assert_eq!(payload.len(), 1);
    assert_eq!(
        value_at(
            payload.errors(),
            "insolvency.0.case_numbers.0.case_number",
            "case_number"
        ),
        Some("1")
    );
}

#[test]
fn test_acsp_profile_delta() {
    let service = shipped_service();
    let body = r#"{"acsp_number": "AP123456", "name": "Agent Ltd", "type": "limited-company", "status": "active", "delta_at": "20240101120000000000"}"#;
    assert_eq!(service.validate(json_post("/delta/acsp", body), "contextId"), Ok(None));

    let body = r#"{"acsp_number": "X1", "name": "Agent Ltd", "type": "limited-company", "status": "closed", "delta_at": "20240101120000000000"}"#;
    let payload = service
        .validate(json_post("/delta/acsp", body), "contextId")
        .unwrap()
        .unwrap();
    let expected = vec![
        delta_validator::NormalizedError {
            error: String::new(),
            error_values: Default::default(),
            location: "acsp_number".to_string(),
            location_type: "json-path".to_string(),
            error_type: "ch:validation".to_string(),
        },
        delta_validator::NormalizedError {
            error: String::new(),
            error_values: Default::default(),
            location: "status".to_string(),
            location_type: "json-path".to_string(),
            error_type: "ch:validation".to_string(),
        },
    ];
    assert!(same_locations(payload.errors(), &expected));
}

#[test]
fn test_malformed_json_is_single_body_error() {
    let service = shipped_service();
    let payload = service
        .validate(json_post("/delta/company", "{\"company_number\": "), "contextId")
        .unwrap()
        .unwrap();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload.errors()[0].location, "request-body");
    assert!(payload.errors()[0].error_values.is_empty());
}
