//! Graph-service configuration, loaded from environment variables at startup.

use std::path::PathBuf;

/// Runtime configuration for storymint-graph.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// Base URL of the decentralized-graph node.
    pub node_endpoint: String,

    /// Port the node's API listens on.
    pub node_port: u16,

    /// Epochs a published asset is paid to live for.
    pub epochs_num: u32,

    /// Finalization confirmations to wait for on publish.
    pub finalization_confirmations: u32,

    /// Node replications to require on publish.
    pub node_replications: u32,

    /// Directory holding the published-assets log file.
    pub data_dir: PathBuf,

    /// Per-request timeout for node calls, in seconds.  Publishing waits for
    /// chain finalization, so the default is generous.
    pub node_timeout_secs: u64,

    /// `tracing` filter string.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Serve Swagger UI at `/swagger-ui` (disable in production).
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("STORYMINT_GRAPH_BIND", "0.0.0.0:3000"),
            node_endpoint: env_or(
                "STORYMINT_NODE_ENDPOINT",
                "https://v6-pegasus-node-03.origin-trail.network",
            ),
            node_port: parse_env("STORYMINT_NODE_PORT", 8900),
            epochs_num: parse_env("STORYMINT_EPOCHS", 2),
            finalization_confirmations: parse_env("STORYMINT_FINALIZATION_CONFIRMATIONS", 3),
            node_replications: parse_env("STORYMINT_NODE_REPLICATIONS", 1),
            data_dir: PathBuf::from(env_or("STORYMINT_DATA_DIR", "./data")),
            node_timeout_secs: parse_env("STORYMINT_NODE_TIMEOUT", 600),
            log_level: env_or("STORYMINT_LOG", "info"),
            log_json: std::env::var("STORYMINT_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            enable_swagger: std::env::var("STORYMINT_ENABLE_SWAGGER")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
