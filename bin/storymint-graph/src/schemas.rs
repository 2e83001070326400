//! Request / response types for the graph-service API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::client::QueryType;
use crate::store::PublishedRecord;

/// Request body for `POST /query`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// SPARQL query string.
    pub query: String,
    /// Query flavor; defaults to `SELECT`.
    #[serde(rename = "queryType", default)]
    pub query_type: QueryType,
}

/// Response body for `POST /publish` and `POST /query`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GraphResponse {
    pub success: bool,
    /// Whatever the graph node returned.
    #[schema(value_type = Object)]
    pub result: Value,
}

/// Response body for `GET /published-assets`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssetsResponse {
    pub success: bool,
    #[schema(value_type = Vec<Object>)]
    pub assets: Vec<PublishedRecord>,
}
