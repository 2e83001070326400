//! Content-addressed storage collaborator.

use std::future::Future;
use std::time::Duration;

use crate::error::CollabError;

/// Uploads opaque JSON bytes and hands back a content identifier usable to
/// build a retrieval URL.
pub trait ContentStore: Send + Sync {
    /// Upload `bytes` and return the opaque content id.
    fn upload(&self, bytes: &[u8]) -> impl Future<Output = Result<String, CollabError>> + Send;

    /// Public retrieval URL for a previously returned content id.
    fn retrieval_url(&self, cid: &str) -> String;
}

/// HTTP pinning-service implementation.  POSTs the JSON body to the upload
/// endpoint and expects `{ "cid": string }` back; retrieval URLs are built
/// from a configurable public gateway.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    http: reqwest::Client,
    endpoint: String,
    gateway: String,
}

impl HttpContentStore {
    /// Build a store for the pinning service at `endpoint`, with `gateway` as
    /// the retrieval-URL prefix (e.g. `https://ipfs.io/ipfs/`).
    pub fn new(
        endpoint: impl Into<String>,
        gateway: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CollabError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            gateway: gateway.into(),
        })
    }
}

impl ContentStore for HttpContentStore {
    async fn upload(&self, bytes: &[u8]) -> Result<String, CollabError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollabError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CollabError::MalformedBody(e.to_string()))?;

        body.get("cid")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .ok_or_else(|| CollabError::MalformedBody("missing cid field".into()))
    }

    fn retrieval_url(&self, cid: &str) -> String {
        format!("{}{}", self.gateway, cid)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
