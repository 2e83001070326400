//! Chat relay client.
//!
//! Turns the current turn sequence into one request against the relay
//! service and yields the assistant reply text.  The client itself reports
//! failures faithfully; absorbing them into a visible fallback turn is the
//! session's job, so the conversation stays linear even when the backend is
//! down.

use std::future::Future;
use std::time::Duration;

use serde_json::json;

use crate::error::RelayError;
use crate::turn::ChatTurn;

/// External completion service, keyed on the full ordered conversation.
pub trait CompletionClient: Send + Sync {
    /// Produce the assistant reply for the given history.  The slice includes
    /// the newly appended user turn.
    fn complete(&self, turns: &[ChatTurn]) -> impl Future<Output = Result<String, RelayError>> + Send;
}

/// HTTP implementation speaking the relay service's `POST /api/chat` contract:
/// `{ "messages": [...] }` in, `{ "content": string }` out.
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpCompletionClient {
    /// Build a client for the relay at `endpoint` with a bounded per-request
    /// timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, RelayError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "messages": turns }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RelayError::MalformedBody(e.to_string()))?;

        body.get("content")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .ok_or_else(|| RelayError::MalformedBody("missing content field".into()))
    }
}
