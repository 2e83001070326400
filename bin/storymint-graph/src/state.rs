//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::client::HttpGraphClient;
use crate::config::Config;
use crate::store::PublishLog;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Service configuration (env-derived).
    pub config: Arc<Config>,
    /// Decentralized-graph node client.
    pub graph: HttpGraphClient,
    /// Append-only published-assets log.
    pub log: PublishLog,
}
