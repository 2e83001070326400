//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::upstream::UpstreamClient;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Relay configuration (env-derived).
    pub config: Arc<Config>,
    /// Upstream completion client.
    pub upstream: UpstreamClient,
}
