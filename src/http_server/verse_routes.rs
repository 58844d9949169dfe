//! Verse HTTP Routes
//!
//! Looks up a single verse by reference and attaches the references that
//! point at it. The two reads are not transactional.

use axum::{extract::State, routing::get, Json, Router};

use super::errors::{ApiError, ApiResult};
use super::extract::ApiQuery;
use crate::context::AppContext;
use crate::models::Verse;

/// Raw query pairs; a repeated `ref` is not an error
type QueryPairs = Vec<(String, String)>;

/// Create verse routes
pub fn verse_routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/verse", get(verse_handler))
        .with_state(ctx)
}

async fn verse_handler(
    State(ctx): State<AppContext>,
    ApiQuery(params): ApiQuery<QueryPairs>,
) -> ApiResult<Json<Verse>> {
    let reference = first_ref(params).ok_or(ApiError::MissingParam("ref"))?;

    let verse = ctx
        .store
        .verse(&reference)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no verse with reference {}", reference)))?;

    let related = ctx.store.related_verses(&reference).await?;

    Ok(Json(verse.with_related(related)))
}

/// The first `ref` value, unless it is blank
fn first_ref(params: QueryPairs) -> Option<String> {
    params
        .into_iter()
        .find(|(key, _)| key == "ref")
        .map(|(_, value)| value)
        .filter(|value| !value.trim().is_empty())
}
