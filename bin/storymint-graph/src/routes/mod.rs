//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - Optional Swagger UI / OpenAPI spec endpoint
//! - Health / heartbeat route
//! - Knowledge-asset publish/query routes

mod graph;
mod health;

use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(info(
    title = "storymint-graph",
    description = "StoryMint knowledge-graph API",
    version = "0.1.0",
))]
struct ApiDoc;

fn api_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(graph::GraphApi::openapi());
    root
}

/// Build the complete Axum [`Router`] for the graph service.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(graph::router());

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs()));
    }

    app.with_state(state)
}
