//! Observability HTTP Routes
//!
//! Health check, the endpoint index served at `/`, and the fallback for
//! unmatched paths.

use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::errors::ApiError;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// One entry in the endpoint index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointInfo {
    pub path: String,
    pub description: String,
}

const ENDPOINTS: &[(&str, &str)] = &[
    ("/verse?ref={reference}", "A Bible verse and the references related to it"),
    ("/geo/north-america", "Natural Earth country polygons for North America as GeoJSON"),
    ("/pop-places/state/{state}/counties", "AHCB counties in a state"),
    ("/pop-places/state/{state}/places", "Populated places in a state"),
    ("/pop-places/county/{county}/places", "Populated places in an AHCB county"),
    ("/pop-places/place/{place}", "Details for a single populated place"),
    ("/health", "Health check"),
];

/// Every endpoint this server exposes
pub fn endpoint_index() -> Vec<EndpointInfo> {
    ENDPOINTS
        .iter()
        .map(|(path, description)| EndpointInfo {
            path: path.to_string(),
            description: description.to_string(),
        })
        .collect()
}

/// Health check and endpoint index
pub fn observability_routes() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn index_handler() -> Json<Vec<EndpointInfo>> {
    Json(endpoint_index())
}

/// Fallback for unmatched paths; 404s are always logged
pub async fn not_found_handler(uri: Uri) -> ApiError {
    warn!(path = %uri, "no route matched");
    ApiError::NotFound(format!("no endpoint at {}", uri.path()))
}
