//! Knowledge-asset publish and query routes.
//!
//! `POST /publish` pushes a knowledge asset to the graph network and records
//! the outcome in the flat-file log; `POST /query` forwards a SPARQL query;
//! `GET /published-assets` returns everything the log holds.  Absence of the
//! log file is not an error, it is simply an empty history.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::Value;
use tracing::info;
use utoipa::OpenApi;

use crate::client::{GraphClient, QueryType};
use crate::error::ServerError;
use crate::schemas::{AssetsResponse, GraphResponse, QueryRequest};
use crate::state::AppState;
use crate::store::PublishedRecord;

#[derive(OpenApi)]
#[openapi(
    paths(publish, query, published_assets),
    components(schemas(QueryRequest, QueryType, GraphResponse, AssetsResponse))
)]
pub struct GraphApi;

/// Register knowledge-asset routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/publish", post(publish))
        .route("/query", post(query))
        .route("/published-assets", get(published_assets))
}

/// Publish a knowledge asset (`POST /publish`).
///
/// The body must be a JSON object; it is forwarded verbatim to the graph
/// node, and the `{timestamp, content, result}` triple is appended to the
/// published-assets log on success.
#[utoipa::path(
    post,
    path = "/publish",
    tag = "graph",
    responses(
        (status = 200, description = "Asset published", body = GraphResponse),
        (status = 400, description = "Body is not a JSON object"),
        (status = 500, description = "Publish failed"),
    )
)]
pub async fn publish(
    State(state): State<Arc<AppState>>,
    Json(content): Json<Value>,
) -> Result<Json<GraphResponse>, ServerError> {
    if !content.is_object() {
        return Err(ServerError::BadRequest(
            "invalid content: provide a valid JSON object".into(),
        ));
    }

    info!("publishing knowledge asset");
    let result = state.graph.publish_asset(&content).await?;

    state
        .log
        .append(PublishedRecord {
            timestamp: Utc::now(),
            content,
            result: result.clone(),
        })
        .await?;

    Ok(Json(GraphResponse { success: true, result }))
}

/// Forward a SPARQL query to the graph node (`POST /query`).
#[utoipa::path(
    post,
    path = "/query",
    tag = "graph",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Query answered", body = GraphResponse),
        (status = 400, description = "Missing or invalid query string"),
        (status = 500, description = "Query failed"),
    )
)]
pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<GraphResponse>, ServerError> {
    if req.query.trim().is_empty() {
        return Err(ServerError::BadRequest("missing or invalid query string".into()));
    }

    let result = state.graph.query(&req.query, req.query_type).await?;
    Ok(Json(GraphResponse { success: true, result }))
}

/// The full publish history (`GET /published-assets`).
#[utoipa::path(
    get,
    path = "/published-assets",
    tag = "graph",
    responses(
        (status = 200, description = "Published assets listed", body = AssetsResponse),
    )
)]
pub async fn published_assets(State(state): State<Arc<AppState>>) -> Json<AssetsResponse> {
    let assets = state.log.load().await;
    Json(AssetsResponse { success: true, assets })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::client::HttpGraphClient;
    use crate::config::Config;
    use crate::store::PublishLog;

    fn test_state() -> Arc<AppState> {
        let cfg = Config::from_env();
        let graph = HttpGraphClient::new(&cfg).expect("client builds");
        let log = PublishLog::new(&std::env::temp_dir().join(format!(
            "storymint-graph-routes-{}",
            uuid::Uuid::new_v4()
        )));
        Arc::new(AppState { config: Arc::new(cfg), graph, log })
    }

    #[tokio::test]
    async fn publish_rejects_non_object_bodies() {
        let result = publish(State(test_state()), Json(Value::String("nope".into()))).await;
        assert!(matches!(result, Err(ServerError::BadRequest(_))));
    }

    #[tokio::test]
    async fn query_rejects_blank_query_strings() {
        let req = QueryRequest { query: "   ".into(), query_type: Default::default() };
        let result = query(State(test_state()), Json(req)).await;
        assert!(matches!(result, Err(ServerError::BadRequest(_))));
    }

    #[tokio::test]
    async fn published_assets_answers_empty_when_no_log_exists() {
        let Json(body) = published_assets(State(test_state())).await;
        assert!(body.success);
        assert!(body.assets.is_empty());
    }
}
