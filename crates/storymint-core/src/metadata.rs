//! Registration metadata assembly and content fingerprinting.
//!
//! Two distinct objects are produced for every registration:
//! the *registration metadata* (form fields + provenance attributes) and the
//! *asset metadata* (a standardized descriptor of the creative work with
//! creator attribution).  Each is serialized exactly once; the same bytes are
//! uploaded and fingerprinted, so the digest the chain records always matches
//! the uploaded content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::turn::License;

/// User-supplied registration form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub license: License,
}

/// One provenance attribute on the registration metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// Provenance attributes for a registered turn: the originating prompt (when
/// one was found) followed by the response content.
pub fn build_attributes(prompt: Option<&str>, response: &str) -> Vec<Attribute> {
    let mut attributes = Vec::with_capacity(2);
    if let Some(question) = prompt {
        attributes.push(Attribute {
            trait_type: "user_question".into(),
            value: question.to_owned(),
        });
    }
    attributes.push(Attribute {
        trait_type: "ai_response".into(),
        value: response.to_owned(),
    });
    attributes
}

/// The registration metadata object: form fields merged with provenance
/// attributes.
pub fn registration_metadata(form: &RegisterForm, attributes: &[Attribute]) -> Value {
    json!({
        "title": form.title,
        "description": form.description,
        "tags": form.tags,
        "license": form.license,
        "attributes": attributes,
    })
}

/// The standardized asset descriptor, distinct from the registration form
/// metadata.  Attribution is derived from the registrar's on-chain identity;
/// the creation time travels as an epoch-millisecond string.
pub fn asset_metadata(form: &RegisterForm, creator: &str, created_at: DateTime<Utc>) -> Value {
    json!({
        "title": form.title,
        "description": form.description,
        "createdAt": created_at.timestamp_millis().to_string(),
        "creators": [{
            "name": creator,
            "address": creator,
            "contributionPercent": 100,
        }],
    })
}

/// A metadata object frozen to its canonical byte form, with the SHA-256
/// fingerprint of exactly those bytes.
#[derive(Debug, Clone)]
pub struct CanonicalPayload {
    pub bytes: Vec<u8>,
    pub fingerprint: String,
}

impl CanonicalPayload {
    /// Serialize `value` once and fingerprint the resulting bytes.
    pub fn freeze(value: &Value) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(value)?;
        let fingerprint = hex::encode(Sha256::digest(&bytes));
        Ok(Self { bytes, fingerprint })
    }

    /// The fingerprint in the `0x`-prefixed form the chain registrar expects.
    pub fn chain_hash(&self) -> String {
        format!("0x{}", self.fingerprint)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
