use crate::state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// CORS layer for the browser client.
///
/// With no configured origins the layer is wildcard, which suits local
/// development; set `STORYMINT_CORS_ORIGINS` in production.
pub fn cors_layer(state: Arc<AppState>) -> CorsLayer {
    match &state.config.cors_allowed_origins {
        Some(origins_str) => {
            let origins: Vec<axum::http::HeaderValue> = origins_str
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any)
            } else {
                CorsLayer::new().allow_origin(origins).allow_headers(Any).allow_methods(Any)
            }
        }
        None => CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any),
    }
}
