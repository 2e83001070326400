//! Relay configuration, loaded from environment variables at startup.

/// Runtime configuration for storymint-relay.
///
/// Every field has a sensible default so the relay works out-of-the-box;
/// only the upstream API key genuinely needs to be provided.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3001"`).
    pub bind_address: String,

    /// Base URL of the upstream OpenAI-compatible completion API.
    pub upstream_base_url: String,

    /// Bearer token for the upstream API.
    pub upstream_api_key: String,

    /// Model identifier forwarded to the upstream API.
    pub model: String,

    /// Token budget per completion.
    pub max_tokens: u32,

    /// Sampling temperature forwarded upstream.
    pub temperature: f32,

    /// Per-request timeout for the upstream call, in seconds.
    pub upstream_timeout_secs: u64,

    /// Comma-separated allowed CORS origins; `None` means wildcard (dev).
    pub cors_allowed_origins: Option<String>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
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
            bind_address: env_or("STORYMINT_RELAY_BIND", "0.0.0.0:3001"),
            upstream_base_url: env_or("STORYMINT_UPSTREAM_URL", "https://api.anthropic.com/v1"),
            upstream_api_key: env_or("STORYMINT_API_KEY", ""),
            model: env_or("STORYMINT_MODEL", "claude-3-opus-20240229"),
            max_tokens: parse_env("STORYMINT_MAX_TOKENS", 512),
            temperature: parse_env("STORYMINT_TEMPERATURE", 0.7),
            upstream_timeout_secs: parse_env("STORYMINT_UPSTREAM_TIMEOUT", 30),
            cors_allowed_origins: std::env::var("STORYMINT_CORS_ORIGINS").ok(),
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
