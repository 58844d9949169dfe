//! Populated Places HTTP Routes
//!
//! Names of populated places in 1926-1928, keyed by their AHCB county.
//!
//! State codes are stored uppercase and county codes lowercase; both are
//! normalized here so lookups are case-insensitive for clients.

use axum::{extract::State, routing::get, Json, Router};

use super::errors::{ApiError, ApiResult};
use super::extract::ApiPath;
use crate::context::AppContext;
use crate::models::{County, Place, PlaceDetail};

/// Create populated places routes
pub fn pop_places_routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/state/:state/counties", get(counties_in_state_handler))
        .route("/state/:state/places", get(places_in_state_handler))
        .route("/county/:county/places", get(places_in_county_handler))
        .route("/place/:place", get(place_handler))
        .with_state(ctx)
}

// ==================
// List Handlers
// ==================

async fn counties_in_state_handler(
    State(ctx): State<AppContext>,
    ApiPath(state): ApiPath<String>,
) -> ApiResult<Json<Vec<County>>> {
    let counties = ctx.store.counties_in_state(&state.to_uppercase()).await?;
    Ok(Json(counties))
}

async fn places_in_state_handler(
    State(ctx): State<AppContext>,
    ApiPath(state): ApiPath<String>,
) -> ApiResult<Json<Vec<Place>>> {
    let places = ctx.store.places_in_state(&state.to_uppercase()).await?;
    Ok(Json(places))
}

async fn places_in_county_handler(
    State(ctx): State<AppContext>,
    ApiPath(county): ApiPath<String>,
) -> ApiResult<Json<Vec<Place>>> {
    let places = ctx.store.places_in_county(&county.to_lowercase()).await?;
    Ok(Json(places))
}

// ==================
// Detail Handler
// ==================

async fn place_handler(
    State(ctx): State<AppContext>,
    ApiPath(place): ApiPath<String>,
) -> ApiResult<Json<PlaceDetail>> {
    let place_id = parse_place_id(&place)?;

    ctx.store
        .place(place_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no place with id {}", place_id)))
}

fn parse_place_id(raw: &str) -> ApiResult<i32> {
    raw.parse()
        .map_err(|_| ApiError::InvalidParam("place ID must be an integer".to_string()))
}
