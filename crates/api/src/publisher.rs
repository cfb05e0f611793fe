//! Publishing validated deltas onto bus topics.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

use crate::error::PublishError;

/// Schema registry subject describing [`DeltaEnvelope`].
pub const SCHEMA_SUBJECT: &str = "chs-delta";

const AVRO_CONTENT_TYPE: &str = "application/vnd.kafka.avro.v2+json";

/// Sends a raw delta body to a topic.
#[async_trait]
pub trait DeltaPublisher: Send + Sync {
    async fn publish(
        &self,
        topic: &str,
        data: &str,
        context_id: &str,
        is_delete: bool,
    ) -> Result<(), PublishError>;
}

/// The generic message placed on every delta topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaEnvelope {
    pub data: String,
    pub attempt: i32,
    pub context_id: String,
    pub created_at: String,
    pub is_delete: bool,
}

impl DeltaEnvelope {
    pub fn new(data: impl Into<String>, context_id: impl Into<String>, is_delete: bool) -> Self {
        Self {
            data: data.into(),
            attempt: 0,
            context_id: context_id.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            is_delete,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SchemaVersion {
    id: i64,
}

#[derive(Debug, Serialize)]
struct ProduceRecord<'a> {
    value: &'a DeltaEnvelope,
}

#[derive(Debug, Serialize)]
struct ProduceRequest<'a> {
    value_schema_id: i64,
    records: Vec<ProduceRecord<'a>>,
}

/// Publishes through a bus REST proxy using the registered Avro schema.
pub struct RestProxyPublisher {
    client: reqwest::Client,
    brokers: Vec<String>,
    next: AtomicUsize,
    schema_id: i64,
}

impl RestProxyPublisher {
    /// Look up the envelope schema id; start-up fails if the registry cannot supply it.
    pub async fn init(brokers: Vec<String>, registry_url: &str) -> Result<Self, PublishError> {
        if brokers.is_empty() {
            return Err(PublishError::NoBrokers);
        }
        for broker in &brokers {
            check_broker_url(broker)?;
        }
        let client = reqwest::Client::new();
        let url = format!(
            "{}/subjects/{}/versions/latest",
            registry_url.trim_end_matches('/'),
            SCHEMA_SUBJECT
        );

        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(PublishError::Schema(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }
        let version: SchemaVersion = response
            .json()
            .await
            .map_err(|e| PublishError::Schema(format!("unreadable registry response: {}", e)))?;

        info!(schema_id = version.id, brokers = brokers.len(), "Delta schema loaded");
        Ok(Self {
            client,
            brokers,
            next: AtomicUsize::new(0),
            schema_id: version.id,
        })
    }

    pub fn with_schema_id(brokers: Vec<String>, schema_id: i64) -> Self {
        Self {
            client: reqwest::Client::new(),
            brokers,
            next: AtomicUsize::new(0),
            schema_id,
        }
    }

    pub fn schema_id(&self) -> i64 {
        self.schema_id
    }

    fn next_broker(&self) -> Option<&str> {
        if self.brokers.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.brokers.len();
        Some(self.brokers[index].trim_end_matches('/'))
    }
}

/// Brokers are REST proxy base URLs, so a bare `host:port` is refused.
fn check_broker_url(broker: &str) -> Result<(), PublishError> {
    let url = reqwest::Url::parse(broker)
        .map_err(|e| PublishError::InvalidBroker(format!("'{}': {}", broker, e)))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(()),
        scheme => Err(PublishError::InvalidBroker(format!(
            "'{}': expected an http(s) URL, got scheme '{}'",
            broker, scheme
        ))),
    }
}

#[async_trait]
impl DeltaPublisher for RestProxyPublisher {
    async fn publish(
        &self,
        topic: &str,
        data: &str,
        context_id: &str,
        is_delete: bool,
    ) -> Result<(), PublishError> {
        let broker = self.next_broker().ok_or(PublishError::NoBrokers)?;
        let envelope = DeltaEnvelope::new(data, context_id, is_delete);
        let request = ProduceRequest {
            value_schema_id: self.schema_id,
            records: vec![ProduceRecord { value: &envelope }],
        };

        let url = format!("{}/topics/{}", broker, topic);
        debug!(context_id = %context_id, url = %url, "Publishing delta");
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, AVRO_CONTENT_TYPE)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Clone, Default)]
    struct Captured {
        requests: Arc<Mutex<Vec<(String, String, Value)>>>,
    }

    async fn produce(
        State(captured): State<Captured>,
        Path(topic): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        captured.requests.lock().unwrap().push((topic.clone(), content_type, body));
        if topic == "rejected" {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::OK
        }
    }

    async fn spawn_proxy() -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/subjects/chs-delta/versions/latest",
                get(|| async { Json(json!({"subject": "chs-delta", "version": 3, "id": 42, "schema": "{}"})) }),
            )
            .route("/topics/:topic", post(produce))
            .with_state(captured.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), captured)
    }

    #[test]
    fn test_envelope_shape() {
        let envelope = DeltaEnvelope::new(r#"{"a":1}"#, "ctx-1", true);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["data"], r#"{"a":1}"#);
        assert_eq!(value["attempt"], 0);
        assert_eq!(value["context_id"], "ctx-1");
        assert_eq!(value["is_delete"], true);
        assert!(chrono::DateTime::parse_from_rfc3339(value["created_at"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_brokers_are_used_round_robin() {
        let publisher = RestProxyPublisher::with_schema_id(
            vec!["http://a/".to_string(), "http://b".to_string()],
            1,
        );
        assert_eq!(publisher.next_broker(), Some("http://a"));
        assert_eq!(publisher.next_broker(), Some("http://b"));
        assert_eq!(publisher.next_broker(), Some("http://a"));
    }

    #[test]
    fn test_broker_urls_must_be_http() {
        assert!(check_broker_url("http://proxy:8082").is_ok());
        assert!(check_broker_url("https://proxy.internal/").is_ok());
        assert!(matches!(
            check_broker_url("kafka:9092"),
            Err(PublishError::InvalidBroker(_))
        ));
        assert!(matches!(
            check_broker_url("proxy"),
            Err(PublishError::InvalidBroker(_))
        ));
    }

    #[tokio::test]
    async fn test_init_rejects_bare_broker_address() {
        let (base, _captured) = spawn_proxy().await;
        let result =
            RestProxyPublisher::init(vec![base.clone(), "kafka:9092".to_string()], &base).await;
        assert!(matches!(result, Err(PublishError::InvalidBroker(message)) if message.contains("kafka:9092")));
    }

    #[tokio::test]
    async fn test_init_requires_brokers() {
        let result = RestProxyPublisher::init(Vec::new(), "http://registry").await;
        assert!(matches!(result, Err(PublishError::NoBrokers)));
    }

    #[tokio::test]
    async fn test_init_reads_schema_id_and_publishes() {
        let (base, captured) = spawn_proxy().await;
        let publisher = RestProxyPublisher::init(vec![base.clone()], &base).await.unwrap();
        assert_eq!(publisher.schema_id(), 42);

        publisher
            .publish("officers-delta", r#"{"internal_id":"123"}"#, "ctx-9", false)
            .await
            .unwrap();

        let requests = captured.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (topic, content_type, body) = &requests[0];
        assert_eq!(topic, "officers-delta");
        assert_eq!(content_type, AVRO_CONTENT_TYPE);
        assert_eq!(body["value_schema_id"], 42);
        let value = &body["records"][0]["value"];
        assert_eq!(value["data"], r#"{"internal_id":"123"}"#);
        assert_eq!(value["context_id"], "ctx-9");
        assert_eq!(value["is_delete"], false);
    }

    #[tokio::test]
    async fn test_rejected_publish_is_an_error() {
        let (base, _captured) = spawn_proxy().await;
        let publisher = RestProxyPublisher::with_schema_id(vec![base], 42);

        let result = publisher.publish("rejected", "{}", "ctx", false).await;
        assert!(matches!(result, Err(PublishError::Rejected { status: 422, .. })));
    }

    #[tokio::test]
    async fn test_init_fails_when_registry_has_no_subject() {
        let (base, _captured) = spawn_proxy().await;
        let registry = format!("{}/missing", base);
        let result = RestProxyPublisher::init(vec![base], &registry).await;
        assert!(matches!(result, Err(PublishError::Schema(_))));
    }
}
