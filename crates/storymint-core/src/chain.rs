//! Blockchain registration collaborator.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CollabError;

/// Input to the minting/registration operation: both uploaded metadata
/// objects, each by retrieval URI and content fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintRequest {
    #[serde(rename = "contentURI")]
    pub content_uri: String,
    #[serde(rename = "contentHash")]
    pub content_hash: String,
    #[serde(rename = "secondaryURI")]
    pub secondary_uri: String,
    #[serde(rename = "secondaryHash")]
    pub secondary_hash: String,
}

/// What the registrar hands back once the asset exists on-chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintReceipt {
    #[serde(rename = "transactionReference")]
    pub tx_reference: String,
    #[serde(rename = "assetId")]
    pub asset_id: String,
}

/// Mints and registers an IP asset on the external ledger.
pub trait ChainRegistrar: Send + Sync {
    fn mint_and_register(
        &self,
        request: &MintRequest,
    ) -> impl Future<Output = Result<MintReceipt, CollabError>> + Send;

    /// The on-chain identity registrations are attributed to.
    fn creator_address(&self) -> &str;
}

/// HTTP implementation against a registrar gateway.
#[derive(Debug, Clone)]
pub struct HttpChainRegistrar {
    http: reqwest::Client,
    endpoint: String,
    creator: String,
}

impl HttpChainRegistrar {
    /// Build a registrar client for the gateway at `endpoint`, attributing
    /// registrations to `creator`.
    pub fn new(
        endpoint: impl Into<String>,
        creator: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CollabError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            creator: creator.into(),
        })
    }
}

impl ChainRegistrar for HttpChainRegistrar {
    async fn mint_and_register(&self, request: &MintRequest) -> Result<MintReceipt, CollabError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollabError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<MintReceipt>()
            .await
            .map_err(|e| CollabError::MalformedBody(e.to_string()))
    }

    fn creator_address(&self) -> &str {
        &self.creator
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
