//! The registration workflow: provenance → metadata → uploads → mint.
//!
//! [`run`] performs the strictly sequential external half of the workflow and
//! returns a tagged error naming the failing step.  It touches no session
//! state; [`crate::session::ChatSession::register`] owns the guard, the
//! optimistic `Pending` transition, and the commit/fail transitions, so every
//! error path here structurally ends in a `Failed` turn rather than a stuck
//! `Pending` one.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::chain::{ChainRegistrar, MintReceipt, MintRequest};
use crate::content::ContentStore;
use crate::error::{RegisterError, RegisterStep};
use crate::metadata::{self, CanonicalPayload, RegisterForm};

/// Execute steps 2–6 of the workflow for one turn.
///
/// `response` is the selected turn's content; `prompt` the originating user
/// question when provenance resolution found one.  Each upload pairs the
/// content id with a fingerprint computed over exactly the uploaded bytes.
pub async fn run(
    response: &str,
    prompt: Option<&str>,
    form: &RegisterForm,
    now: DateTime<Utc>,
    content: &impl ContentStore,
    chain: &impl ChainRegistrar,
) -> Result<MintReceipt, RegisterError> {
    // Provenance + registration metadata.
    let attributes = metadata::build_attributes(prompt, response);
    let registration = metadata::registration_metadata(form, &attributes);
    let registration = CanonicalPayload::freeze(&registration)?;

    let registration_cid = content
        .upload(&registration.bytes)
        .await
        .map_err(RegisterError::at(RegisterStep::UploadMetadata))?;
    debug!(cid = %registration_cid, "registration metadata uploaded");

    // Asset-level descriptor, uploaded and fingerprinted independently.
    let asset = metadata::asset_metadata(form, chain.creator_address(), now);
    let asset = CanonicalPayload::freeze(&asset)?;

    let asset_cid = content
        .upload(&asset.bytes)
        .await
        .map_err(RegisterError::at(RegisterStep::UploadAssetMetadata))?;
    debug!(cid = %asset_cid, "asset metadata uploaded");

    let request = MintRequest {
        content_uri: content.retrieval_url(&registration_cid),
        content_hash: registration.chain_hash(),
        secondary_uri: content.retrieval_url(&asset_cid),
        secondary_hash: asset.chain_hash(),
    };

    let receipt = chain
        .mint_and_register(&request)
        .await
        .map_err(RegisterError::at(RegisterStep::Mint))?;
    debug!(tx = %receipt.tx_reference, asset = %receipt.asset_id, "asset registered on-chain");

    Ok(receipt)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
