//! Geography HTTP Routes
//!
//! Natural Earth country polygons for North America, served from the
//! boot-time cache. No request touches the database.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::context::AppContext;

/// Create geography routes
pub fn geo_routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/north-america", get(north_america_handler))
        .with_state(ctx)
}

async fn north_america_handler(State(ctx): State<AppContext>) -> impl IntoResponse {
    let payload = ctx.geojson.get().await;
    ([(header::CONTENT_TYPE, "application/json")], payload)
}
