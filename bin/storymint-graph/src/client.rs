//! Client for the decentralized-graph node.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

/// Failures of a graph-node call.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("node returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("node response malformed: {0}")]
    MalformedBody(String),
}

/// SPARQL query flavor accepted by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    #[default]
    Select,
    Construct,
}

/// Knowledge-asset operations against the graph node.
pub trait GraphClient: Send + Sync {
    fn publish_asset(
        &self,
        content: &Value,
    ) -> impl std::future::Future<Output = Result<Value, GraphError>> + Send;

    fn query(
        &self,
        query: &str,
        query_type: QueryType,
    ) -> impl std::future::Future<Output = Result<Value, GraphError>> + Send;
}

/// Reqwest-backed node client.
#[derive(Debug, Clone)]
pub struct HttpGraphClient {
    http: reqwest::Client,
    base_url: String,
    epochs_num: u32,
    finalization_confirmations: u32,
    node_replications: u32,
}

impl HttpGraphClient {
    pub fn new(cfg: &Config) -> Result<Self, GraphError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.node_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: format!(
                "{}:{}/v1",
                cfg.node_endpoint.trim_end_matches('/'),
                cfg.node_port
            ),
            epochs_num: cfg.epochs_num,
            finalization_confirmations: cfg.finalization_confirmations,
            node_replications: cfg.node_replications,
        })
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, GraphError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| GraphError::MalformedBody(e.to_string()))
    }
}

impl GraphClient for HttpGraphClient {
    async fn publish_asset(&self, content: &Value) -> Result<Value, GraphError> {
        debug!("publishing knowledge asset");
        self.post(
            "/assets",
            json!({
                "content": content,
                "options": {
                    "epochsNum": self.epochs_num,
                    "minimumNumberOfFinalizationConfirmations": self.finalization_confirmations,
                    "minimumNumberOfNodeReplications": self.node_replications,
                },
            }),
        )
        .await
    }

    async fn query(&self, query: &str, query_type: QueryType) -> Result<Value, GraphError> {
        debug!(?query_type, "forwarding graph query");
        self.post("/query", json!({ "query": query, "type": query_type }))
            .await
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn query_type_serializes_uppercase_and_defaults_to_select() {
        assert_eq!(serde_json::to_value(QueryType::Select).unwrap(), "SELECT");
        assert_eq!(serde_json::to_value(QueryType::Construct).unwrap(), "CONSTRUCT");
        assert_eq!(QueryType::default(), QueryType::Select);
    }
}
