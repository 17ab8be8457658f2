use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of a repository search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySearchResult<T> {
    pub total: u64,
    #[serde(default)]
    pub aggregations: Map<String, Value>,
    pub elements: Vec<T>,
}

impl<T> EntitySearchResult<T> {
    pub fn new(total: u64, elements: Vec<T>) -> Self {
        Self {
            total,
            aggregations: Map::new(),
            elements,
        }
    }
}

/// Response body of the blog listing route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogRouteResponse<T> {
    #[serde(flatten)]
    pub result: EntitySearchResult<T>,
    #[serde(rename = "apiAlias")]
    pub api_alias: String,
}

impl<T> BlogRouteResponse<T> {
    pub fn new(result: EntitySearchResult<T>) -> Self {
        Self {
            result,
            api_alias: "dal_entity_search_result".to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
