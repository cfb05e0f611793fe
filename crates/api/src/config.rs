//! Service configuration, read from flags or the environment.

use clap::Parser;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use tracing::info;

use crate::error::ConfigError;
use crate::routes::TopicKey;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "delta-api")]
#[command(about = "Delta API - validates delta payloads and publishes them onto bus topics", long_about = None)]
#[command(version)]
pub struct Config {
    /// Address to listen on, e.g. `:4001` or `127.0.0.1:4001`
    #[arg(long, env = "BIND_ADDR")]
    pub bind_addr: Option<String>,

    /// Bus REST proxy base URLs (`http(s)://host:port`), comma separated
    #[arg(long, env = "KAFKA_BROKER_ADDR", value_delimiter = ',')]
    pub kafka_broker_addr: Vec<String>,

    /// Schema registry holding the chs-delta schema
    #[arg(long, env = "SCHEMA_REGISTRY_URL")]
    pub schema_registry_url: Option<String>,

    /// Path to the OpenAPI document requests are validated against
    #[arg(long, env = "OPEN_API_SPEC")]
    pub open_api_spec: Option<String>,

    #[arg(long, env = "OFFICER_DELTA_TOPIC")]
    pub officer_delta_topic: Option<String>,

    #[arg(long, env = "INSOLVENCY_DELTA_TOPIC")]
    pub insolvency_delta_topic: Option<String>,

    #[arg(long, env = "CHARGES_DELTA_TOPIC")]
    pub charges_delta_topic: Option<String>,

    #[arg(long, env = "DISQUALIFIED_OFFICERS_DELTA_TOPIC")]
    pub disqualified_officers_delta_topic: Option<String>,

    #[arg(long, env = "COMPANY_DELTA_TOPIC")]
    pub company_delta_topic: Option<String>,

    #[arg(long, env = "EXEMPTION_DELTA_TOPIC")]
    pub exemption_delta_topic: Option<String>,

    #[arg(long, env = "PSC_STATEMENT_DELTA_TOPIC")]
    pub psc_statement_delta_topic: Option<String>,

    #[arg(long, env = "PSC_DELTA_TOPIC")]
    pub psc_delta_topic: Option<String>,

    #[arg(long, env = "FILING_HISTORY_DELTA_TOPIC")]
    pub filing_history_delta_topic: Option<String>,

    #[arg(long, env = "DOCUMENT_STORE_DELTA_TOPIC")]
    pub document_store_delta_topic: Option<String>,

    #[arg(long, env = "REGISTERS_DELTA_TOPIC")]
    pub registers_delta_topic: Option<String>,

    #[arg(long, env = "ACSP_PROFILE_DELTA_TOPIC")]
    pub acsp_profile_delta_topic: Option<String>,

    /// Emit log lines as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Config {
    pub fn topic(&self, key: TopicKey) -> Option<&str> {
        let value = match key {
            TopicKey::Officer => &self.officer_delta_topic,
            TopicKey::Insolvency => &self.insolvency_delta_topic,
            TopicKey::Charges => &self.charges_delta_topic,
            TopicKey::DisqualifiedOfficers => &self.disqualified_officers_delta_topic,
            TopicKey::Company => &self.company_delta_topic,
            TopicKey::Exemption => &self.exemption_delta_topic,
            TopicKey::PscStatement => &self.psc_statement_delta_topic,
            TopicKey::Psc => &self.psc_delta_topic,
            TopicKey::FilingHistory => &self.filing_history_delta_topic,
            TopicKey::DocumentStore => &self.document_store_delta_topic,
            TopicKey::Registers => &self.registers_delta_topic,
            TopicKey::AcspProfile => &self.acsp_profile_delta_topic,
        };
        present(value)
    }

    /// Broker addresses with blanks removed.
    pub fn brokers(&self) -> Vec<String> {
        self.kafka_broker_addr
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Check that every mandatory value is set, reporting all missing ones at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        let scalars = [
            ("BIND_ADDR", &self.bind_addr),
            ("SCHEMA_REGISTRY_URL", &self.schema_registry_url),
            ("OPEN_API_SPEC", &self.open_api_spec),
        ];
        for (name, value) in scalars {
            if present(value).is_none() {
                missing.push(name.to_string());
            }
        }
        if self.brokers().is_empty() {
            missing.push("KAFKA_BROKER_ADDR".to_string());
        }
        for key in TopicKey::ALL {
            if self.topic(key).is_none() {
                missing.push(key.env_name().to_string());
            }
        }

        if missing.is_empty() {
            return Ok(());
        }
        for name in &missing {
            info!(name = %name, "Mandatory configuration parameter is not set");
        }
        Err(ConfigError::MissingMandatory(missing))
    }

    /// Socket address to bind; a bare `:port` listens on every interface.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = present(&self.bind_addr)
            .ok_or_else(|| ConfigError::MissingMandatory(vec!["BIND_ADDR".to_string()]))?;
        let full = if raw.starts_with(':') {
            format!("0.0.0.0{}", raw)
        } else {
            raw.to_string()
        };
        full.parse()
            .map_err(|e| ConfigError::Invalid(format!("BIND_ADDR '{}': {}", raw, e)))
    }

    pub fn topics(&self) -> Result<Topics, ConfigError> {
        let mut names = BTreeMap::new();
        let mut missing = Vec::new();
        for key in TopicKey::ALL {
            match self.topic(key) {
                Some(topic) => {
                    names.insert(key, topic.to_string());
                }
                None => missing.push(key.env_name().to_string()),
            }
        }
        if missing.is_empty() {
            Ok(Topics { names })
        } else {
            Err(ConfigError::MissingMandatory(missing))
        }
    }
}

/// Resolved topic name for every delta kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    names: BTreeMap<TopicKey, String>,
}

impl Topics {
    pub fn new(names: BTreeMap<TopicKey, String>) -> Self {
        Self { names }
    }

    pub fn get(&self, key: TopicKey) -> Option<&str> {
        self.names.get(&key).map(String::as_str)
    }
}
