//! Request / response types for the relay API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single message in the conversation history.  Extra client-side fields
/// (ids, timestamps, registration state) are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RelayMessage {
    /// The role of the message author (`"user"` or `"assistant"`).
    pub role: String,
    /// The content of the message.
    pub content: String,
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Full ordered conversation, including the newly sent user message.
    #[serde(default)]
    pub messages: Vec<RelayMessage>,
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    /// The assistant reply text.
    pub content: String,
}
