//! The chat relay route.
//!
//! Stateless passthrough: validates the conversation payload, folds it into a
//! single prompt, forwards it upstream, and returns the reply text.  Upstream
//! failures become a 500 with a generic body; the browser client converts
//! that into a visible fallback message.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::{ChatRequest, ChatResponse, RelayMessage};
use crate::state::AppState;
use crate::upstream;

/// Maximum allowed total prompt length in bytes to prevent memory exhaustion.
const MAX_PROMPT_BYTES: usize = 128 * 1024; // 128 KiB

#[derive(OpenApi)]
#[openapi(
    paths(chat),
    components(schemas(ChatRequest, ChatResponse, RelayMessage))
)]
pub struct ChatApi;

/// Register chat relay routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

/// Relay one conversation to the upstream completion API (`POST /api/chat`).
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Completion generated", body = ChatResponse),
        (status = 400, description = "Missing or empty messages array"),
        (status = 500, description = "Upstream failure"),
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    if req.messages.is_empty() {
        return Err(ServerError::BadRequest("missing or empty messages array".into()));
    }

    let prompt = upstream::build_prompt(&req.messages);
    if prompt.len() > MAX_PROMPT_BYTES {
        return Err(ServerError::BadRequest(format!(
            "conversation too large ({} bytes); maximum is {} bytes",
            prompt.len(),
            MAX_PROMPT_BYTES,
        )));
    }

    let content = state.upstream.complete(&prompt).await?;
    info!(turns = req.messages.len(), reply_len = content.len(), "completion relayed");

    Ok(Json(ChatResponse { content }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::upstream::UpstreamClient;

    fn test_state() -> Arc<AppState> {
        let cfg = Config::from_env();
        let upstream = UpstreamClient::new(&cfg).expect("client builds");
        Arc::new(AppState { config: Arc::new(cfg), upstream })
    }

    #[tokio::test]
    async fn empty_messages_are_rejected_before_any_upstream_call() {
        let result = chat(State(test_state()), Json(ChatRequest { messages: vec![] })).await;
        assert!(matches!(result, Err(ServerError::BadRequest(_))));
    }

    #[tokio::test]
    async fn oversized_conversations_are_rejected() {
        let req = ChatRequest {
            messages: vec![RelayMessage {
                role: "user".into(),
                content: "x".repeat(MAX_PROMPT_BYTES + 1),
            }],
        };
        let result = chat(State(test_state()), Json(req)).await;
        assert!(matches!(result, Err(ServerError::BadRequest(_))));
    }
}
