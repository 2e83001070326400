//! Conversation and registration data model.
//!
//! [`ChatTurn`] is one message in the conversation; [`RegisteredAsset`] is an
//! independent record of a turn's content registered as IP.  An asset copies
//! the turn's text rather than referencing it, so it stays valid even if the
//! originating turn is later removed from the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session-local turn identifier, time-derived.
///
/// Allocated by [`crate::session::ChatSession`] from the current epoch
/// millisecond, bumped past the previously issued value on collision, so ids
/// are unique and strictly increasing within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(pub u64);

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Author of a [`ChatTurn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Where a turn stands in the IP-registration lifecycle.
///
/// Transitions are forward-only: `Unregistered → Pending`, then
/// `Pending → Confirmed` or `Pending → Failed`.  [`may_become`] is the single
/// source of truth for legality; [`crate::store::MessageStore::update`]
/// rejects everything else.
///
/// [`may_become`]: RegistrationState::may_become
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RegistrationState {
    Unregistered,
    Pending,
    Confirmed,
    Failed,
}

impl RegistrationState {
    /// Whether the forward-only transition relation permits `self → next`.
    pub fn may_become(self, next: RegistrationState) -> bool {
        matches!(
            (self, next),
            (RegistrationState::Unregistered, RegistrationState::Pending)
                | (RegistrationState::Pending, RegistrationState::Confirmed)
                | (RegistrationState::Pending, RegistrationState::Failed)
        )
    }
}

/// Denormalized display summary attached to a confirmed turn.
///
/// Present if and only if the turn's state is [`RegistrationState::Confirmed`];
/// the patch type in [`crate::store`] makes it impossible to attach one any
/// other way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub title: String,
    pub confirmed_at: DateTime<Utc>,
    pub chain_reference: String,
}

/// One message in the conversation, authored by the user or the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub id: TurnId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub registration: RegistrationState,
    /// Back-reference to the turn this one was derived from.  Lookup only,
    /// never an ownership link.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub remix_of: Option<TurnId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub record: Option<RegistrationRecord>,
}

impl ChatTurn {
    /// A fresh user turn, optionally linked to the turn it remixes.
    pub fn user(id: TurnId, content: String, remix_of: Option<TurnId>) -> Self {
        Self {
            id,
            role: Role::User,
            content,
            created_at: Utc::now(),
            registration: RegistrationState::Unregistered,
            remix_of,
            record: None,
        }
    }

    /// A fresh assistant turn, always starting unregistered.
    pub fn assistant(id: TurnId, content: String) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content,
            created_at: Utc::now(),
            registration: RegistrationState::Unregistered,
            remix_of: None,
            record: None,
        }
    }
}

/// Kind of creative work a registered asset contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetType {
    Story,
    Poem,
    Image,
    Code,
}

/// Lifecycle status of a [`RegisteredAsset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetStatus {
    Pending,
    Confirmed,
    Failed,
}

/// License granted on a registered asset.  Fixed enumeration; serialized with
/// the human-readable names the registration form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum License {
    #[serde(rename = "All Rights Reserved")]
    #[strum(serialize = "All Rights Reserved")]
    AllRightsReserved,
    #[serde(rename = "CC BY")]
    #[strum(serialize = "CC BY")]
    CcBy,
    #[serde(rename = "CC BY-SA")]
    #[strum(serialize = "CC BY-SA")]
    CcBySa,
    #[serde(rename = "CC BY-NC")]
    #[strum(serialize = "CC BY-NC")]
    CcByNc,
    #[serde(rename = "Public Domain")]
    #[strum(serialize = "Public Domain")]
    PublicDomain,
    #[serde(rename = "Remix Allowed")]
    #[strum(serialize = "Remix Allowed")]
    RemixAllowed,
}

/// A record of a turn's content registered as IP with the external ledger.
///
/// Produced by, but not owned by, exactly one [`ChatTurn`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredAsset {
    /// Service-side identifier, distinct from any [`TurnId`].
    pub id: String,
    pub title: String,
    pub asset_type: AssetType,
    /// Owned copy of the source turn's text.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub status: AssetStatus,
    pub tags: Vec<String>,
    pub license: License,
    /// Opaque on-chain identifier; empty until confirmed.
    pub chain_reference: String,
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn transition_relation_is_forward_only() {
        use RegistrationState::*;
        let all = [Unregistered, Pending, Confirmed, Failed];
        for from in all {
            for to in all {
                let legal = matches!((from, to), (Unregistered, Pending) | (Pending, Confirmed) | (Pending, Failed));
                assert_eq!(from.may_become(to), legal, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn license_serializes_to_form_names() {
        assert_eq!(serde_json::to_value(License::CcBy).unwrap(), "CC BY");
        assert_eq!(
            serde_json::to_value(License::AllRightsReserved).unwrap(),
            "All Rights Reserved"
        );
        let parsed: License = serde_json::from_value(serde_json::json!("Remix Allowed")).unwrap();
        assert_eq!(parsed, License::RemixAllowed);
    }

    #[test]
    fn turn_wire_format_is_camel_case() {
        let turn = ChatTurn::user(TurnId(7), "hi".into(), Some(TurnId(3)));
        let v = serde_json::to_value(&turn).unwrap();
        assert_eq!(v["role"], "user");
        assert_eq!(v["remixOf"], 3);
        assert_eq!(v["registration"], "unregistered");
        assert!(v.get("record").is_none());
    }
}
