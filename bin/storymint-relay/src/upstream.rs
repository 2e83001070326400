//! Client for the upstream OpenAI-compatible completion API.
//!
//! The relay collapses the whole conversation into a single `Human:` /
//! `Assistant:` prompt and sends it as one user message, which keeps the
//! relay model-agnostic: any chat-completions endpoint works.

use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::schemas::RelayMessage;

/// Failures of the upstream completion call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream response malformed: {0}")]
    MalformedBody(String),
}

/// Reqwest-backed upstream client.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl UpstreamClient {
    pub fn new(cfg: &Config) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.upstream_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.upstream_base_url.trim_end_matches('/').to_owned(),
            api_key: cfg.upstream_api_key.clone(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        })
    }

    /// Send one completion request and return the generated text.
    ///
    /// The upstream may legally return an empty choice; that surfaces as an
    /// empty string, not an error.
    pub async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, prompt_len = prompt.len(), "forwarding completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }],
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::MalformedBody(e.to_string()))?;

        match body["choices"][0]["message"]["content"].as_str() {
            Some(content) => Ok(content.to_owned()),
            None if body.get("choices").is_some() => Ok(String::new()),
            None => Err(UpstreamError::MalformedBody("missing choices array".into())),
        }
    }
}

/// Join the conversation into the upstream prompt format: one `Human:` or
/// `Assistant:` line per turn, terminated by a bare `Assistant:` cue.
pub fn build_prompt(messages: &[RelayMessage]) -> String {
    let mut lines: Vec<String> = messages
        .iter()
        .map(|m| {
            if m.role == "user" {
                format!("Human: {}", m.content)
            } else {
                format!("Assistant: {}", m.content)
            }
        })
        .collect();
    lines.push("Assistant:".into());
    lines.join("\n")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
