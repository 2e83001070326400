//! Unified relay error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted to
//! a JSON-body HTTP response.  Upstream detail is logged in full but clients
//! only ever see a generic completion-failure message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::upstream::UpstreamError;

/// All errors that can occur in the relay request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The upstream completion call failed.
    #[error("upstream failure: {0}")]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Upstream(e) => {
                error!(error = %e, "upstream completion failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to generate completion".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}
