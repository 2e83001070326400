//! Unified graph-service error type.
//!
//! Validation failures answer 400 with `{"error": ...}`; node and storage
//! failures answer 500 with `{"success": false, "error": ...}` so callers of
//! the publish/query endpoints always get the `success` flag they key on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::client::GraphError;

/// All errors that can occur in the graph-service request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A graph-node call failed.
    #[error("graph node failure: {0}")]
    Node(#[from] GraphError),

    /// The published-assets log could not be written.
    #[error("store failure: {0}")]
    Store(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            ServerError::BadRequest(m) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
            }
            ServerError::Node(e) => {
                error!(error = %e, "graph node failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": e.to_string() })),
                )
                    .into_response()
            }
            ServerError::Store(e) => {
                error!(error = %e, "failed to persist published asset");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": "failed to persist published asset" })),
                )
                    .into_response()
            }
        }
    }
}
