//! Error types for the relay client, external collaborators, and the
//! registration workflow.
//!
//! The registration workflow returns a tagged error naming the failing step,
//! so the caller can always apply the `Failed` transition instead of leaving
//! a turn stuck in `Pending`.

use thiserror::Error;

use crate::turn::{RegistrationState, TurnId};

/// Failures of the chat relay call.  Absorbed by the session into a visible
/// assistant turn; never surfaced to the caller of `send_message`.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay returned status {0}")]
    Status(u16),

    #[error("relay response malformed: {0}")]
    MalformedBody(String),
}

/// Failures of a registration collaborator (content store or chain registrar).
#[derive(Debug, Error)]
pub enum CollabError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("collaborator returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("collaborator response malformed: {0}")]
    MalformedBody(String),
}

/// The externally fallible steps of the registration workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RegisterStep {
    #[strum(serialize = "metadata upload")]
    UploadMetadata,
    #[strum(serialize = "asset metadata upload")]
    UploadAssetMetadata,
    #[strum(serialize = "on-chain registration")]
    Mint,
}

/// Why a registration request did not produce a confirmed asset.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The selected turn no longer exists in the session.
    #[error("turn {0} not found")]
    TurnNotFound(TurnId),

    /// A workflow for this turn is already in flight; starting a second one
    /// is rejected so a turn can never be submitted on-chain twice.
    #[error("registration already pending for turn {0}")]
    AlreadyPending(TurnId),

    /// The turn has already reached a terminal registration state.
    #[error("turn {id} is not registrable (state: {state})")]
    NotRegistrable { id: TurnId, state: RegistrationState },

    /// The metadata object could not be serialized.
    #[error("metadata could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    /// An external collaborator call failed.
    #[error("{step} failed: {source}")]
    Step {
        step: RegisterStep,
        #[source]
        source: CollabError,
    },
}

impl RegisterError {
    pub(crate) fn at(step: RegisterStep) -> impl FnOnce(CollabError) -> RegisterError {
        move |source| RegisterError::Step { step, source }
    }
}
