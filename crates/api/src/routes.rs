//! The static table of delta endpoints.

use std::fmt;

/// The topic a delta kind is published onto, resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TopicKey {
    Officer,
    Insolvency,
    Charges,
    DisqualifiedOfficers,
    Company,
    Exemption,
    PscStatement,
    Psc,
    FilingHistory,
    DocumentStore,
    Registers,
    AcspProfile,
}

impl TopicKey {
    pub const ALL: [TopicKey; 12] = [
        TopicKey::Officer,
        TopicKey::Insolvency,
        TopicKey::Charges,
        TopicKey::DisqualifiedOfficers,
        TopicKey::Company,
        TopicKey::Exemption,
        TopicKey::PscStatement,
        TopicKey::Psc,
        TopicKey::FilingHistory,
        TopicKey::DocumentStore,
        TopicKey::Registers,
        TopicKey::AcspProfile,
    ];

    /// Environment variable holding the topic name.
    pub fn env_name(&self) -> &'static str {
        match self {
            TopicKey::Officer => "OFFICER_DELTA_TOPIC",
            TopicKey::Insolvency => "INSOLVENCY_DELTA_TOPIC",
            TopicKey::Charges => "CHARGES_DELTA_TOPIC",
            TopicKey::DisqualifiedOfficers => "DISQUALIFIED_OFFICERS_DELTA_TOPIC",
            TopicKey::Company => "COMPANY_DELTA_TOPIC",
            TopicKey::Exemption => "EXEMPTION_DELTA_TOPIC",
            TopicKey::PscStatement => "PSC_STATEMENT_DELTA_TOPIC",
            TopicKey::Psc => "PSC_DELTA_TOPIC",
            TopicKey::FilingHistory => "FILING_HISTORY_DELTA_TOPIC",
            TopicKey::DocumentStore => "DOCUMENT_STORE_DELTA_TOPIC",
            TopicKey::Registers => "REGISTERS_DELTA_TOPIC",
            TopicKey::AcspProfile => "ACSP_PROFILE_DELTA_TOPIC",
        }
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_name())
    }
}

/// One POST endpoint accepting a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaRoute {
    pub name: &'static str,
    pub path: &'static str,
    pub topic: TopicKey,
    /// Body field logged to identify the delta; absent for validate-only routes.
    pub primary_id: Option<&'static str>,
    pub validate_only: bool,
    pub is_delete: bool,
}

const fn delta(name: &'static str, path: &'static str, topic: TopicKey, primary_id: &'static str) -> DeltaRoute {
    DeltaRoute {
        name,
        path,
        topic,
        primary_id: Some(primary_id),
        validate_only: false,
        is_delete: false,
    }
}

const fn delete(name: &'static str, path: &'static str, topic: TopicKey, primary_id: &'static str) -> DeltaRoute {
    DeltaRoute {
        is_delete: true,
        ..delta(name, path, topic, primary_id)
    }
}

pub const HEALTHCHECK_PATH: &str = "/delta/healthcheck";

pub const DELTA_ROUTES: &[DeltaRoute] = &[
    delta("officers", "/delta/officers", TopicKey::Officer, "internal_id"),
    DeltaRoute {
        name: "officers-validate",
        path: "/delta/officers/validate",
        topic: TopicKey::Officer,
        primary_id: None,
        validate_only: true,
        is_delete: false,
    },
    delta("insolvency", "/delta/insolvency", TopicKey::Insolvency, "company_number"),
    delta("charges", "/delta/charges", TopicKey::Charges, "charge_id"),
    delete("charges-delete", "/delta/charges/delete", TopicKey::Charges, "charge_id"),
    delta(
        "disqualification",
        "/delta/disqualification",
        TopicKey::DisqualifiedOfficers,
        "officer_id",
    ),
    delete(
        "disqualification-delete",
        "/delta/disqualification/delete",
        TopicKey::DisqualifiedOfficers,
        "officer_id",
    ),
    delta("company", "/delta/company", TopicKey::Company, "company_number"),
    delete("company-delete", "/delta/company/delete", TopicKey::Company, "company_number"),
    delta("exemption", "/delta/exemption", TopicKey::Exemption, "company_number"),
    delta(
        "psc-statement",
        "/delta/psc-statement",
        TopicKey::PscStatement,
        "psc_statement_id",
    ),
    delete(
        "psc-statement-delete",
        "/delta/psc-statement/delete",
        TopicKey::PscStatement,
        "psc_statement_id",
    ),
    delta("pscs", "/delta/pscs", TopicKey::Psc, "psc_id"),
    delta(
        "filing-history",
        "/delta/filing-history",
        TopicKey::FilingHistory,
        "entity_id",
    ),
    delete(
        "filing-history-delete",
        "/delta/filing-history/delete",
        TopicKey::FilingHistory,
        "entity_id",
    ),
    delta(
        "document-store",
        "/delta/document-store",
        TopicKey::DocumentStore,
        "transaction_id",
    ),
    delta("registers", "/delta/registers", TopicKey::Registers, "company_number"),
    delete(
        "registers-delete",
        "/delta/registers/delete",
        TopicKey::Registers,
        "company_number",
    ),
    delta("acsp", "/delta/acsp", TopicKey::AcspProfile, "acsp_number"),
];
