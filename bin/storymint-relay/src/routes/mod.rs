//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - CORS layer for the browser client
//! - Optional Swagger UI / OpenAPI spec endpoint
//! - Health / heartbeat route
//! - The chat relay route under `/api`

mod chat;
mod health;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::cors;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(info(
    title = "storymint-relay",
    description = "StoryMint chat relay API",
    version = "0.1.0",
))]
struct ApiDoc;

fn api_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(chat::ChatApi::openapi());
    root
}

/// Build the complete Axum [`Router`] for the relay.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .nest("/api", chat::router());

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs()));
    }

    app.layer(ServiceBuilder::new().layer(cors::cors_layer(state.clone())))
        .with_state(state)
}
