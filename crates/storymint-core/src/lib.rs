//! storymint-core – the session lifecycle behind the StoryMint chat surface.
//!
//! A [`session::ChatSession`] owns everything one conversation accumulates:
//! the ordered message store, the registered-asset index, and the one-shot
//! remix context.  All mutation goes through `&mut self`, so per-session
//! effects are serialized even while the external calls (completion relay,
//! content upload, on-chain mint) are in flight.
//!
//! External collaborators are traits ([`relay::CompletionClient`],
//! [`content::ContentStore`], [`chain::ChainRegistrar`]) with reqwest-backed
//! implementations; tests substitute in-memory mocks so no module here ever
//! needs a network to be exercised.

pub mod chain;
pub mod content;
pub mod error;
pub mod index;
pub mod metadata;
pub mod register;
pub mod relay;
pub mod session;
pub mod store;
pub mod turn;

pub use chain::{ChainRegistrar, HttpChainRegistrar, MintReceipt, MintRequest};
pub use content::{ContentStore, HttpContentStore};
pub use error::{CollabError, RegisterError, RegisterStep, RelayError};
pub use index::AssetIndex;
pub use metadata::RegisterForm;
pub use relay::{CompletionClient, HttpCompletionClient};
pub use session::ChatSession;
pub use store::{MessageStore, TurnPatch};
pub use turn::{
    AssetStatus, AssetType, ChatTurn, License, RegisteredAsset, RegistrationRecord,
    RegistrationState, Role, TurnId,
};
