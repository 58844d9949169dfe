//! Endpoint Tests
//!
//! Drives the full router against an in-memory store:
//! - List endpoints return `[]`, never 404, for unknown keys
//! - Malformed identifiers are rejected before the store is called
//! - State and county parameters are case-insensitive
//! - The GeoJSON payload is served from the boot-time cache
//! - Store failures surface as 500 with a generic body

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use dataapi::cache::GeoJsonCache;
use dataapi::context::AppContext;
use dataapi::http_server::{ErrorResponse, HttpServer, HttpServerConfig};
use dataapi::models::{County, Place, PlaceDetail, Verse};
use dataapi::store::{DataStore, MemoryStore};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

const GEOJSON: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","id":"CAN","properties":{"name":"Canada"},"geometry":null}]}"#;

fn place(id: i32, name: &str, county: &str, ahcb: &str, state: &str) -> PlaceDetail {
    PlaceDetail {
        place_id: id,
        place: name.to_string(),
        county: county.to_string(),
        county_ahcb: ahcb.to_string(),
        state: state.to_string(),
    }
}

fn fixture_store() -> MemoryStore {
    MemoryStore::new()
        .with_verse("John 3:16", "For God so loved...")
        .with_verse("Genesis 1:1", "In the beginning...")
        .with_related("Gen 1:1", "Genesis 1:1")
        .with_related("Gn 1:1", "Genesis 1:1")
        .with_place(place(7, "Austin", "Travis", "txs_travis", "TX"))
        .with_place(place(3, "Manor", "Travis", "txs_travis", "TX"))
        .with_place(place(11, "Waco", "McLennan", "txs_mclennan", "TX"))
        .with_place(place(20, "Tulsa", "Tulsa", "oks_tulsa", "OK"))
        .with_geojson(GEOJSON)
}

async fn setup() -> (Arc<MemoryStore>, Router) {
    let memory = Arc::new(fixture_store());
    let store: Arc<dyn DataStore> = memory.clone();
    let ctx = AppContext::build(store).await.unwrap();
    let config = HttpServerConfig {
        request_logging: false,
        ..Default::default()
    };
    (memory, HttpServer::new(config, ctx).router())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap();
    (status, content_type, body.to_vec())
}

async fn get_json<T: DeserializeOwned>(app: &Router, uri: &str) -> (StatusCode, T) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// =============================================================================
// Verse Tests
// =============================================================================

/// A verse with no related references serializes `related` as `[]`.
#[tokio::test]
async fn test_verse_without_related() {
    let (_store, app) = setup().await;

    let (status, content_type, body) = get(&app, "/verse?ref=John%203:16").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    assert_eq!(
        String::from_utf8(body).unwrap(),
        r#"{"reference":"John 3:16","text":"For God so loved...","related":[]}"#
    );
}

#[tokio::test]
async fn test_verse_with_related() {
    let (_store, app) = setup().await;

    let (status, verse): (_, Verse) = get_json(&app, "/verse?ref=Genesis+1:1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(verse.reference, "Genesis 1:1");
    assert_eq!(verse.related, vec!["Gen 1:1", "Gn 1:1"]);
}

#[tokio::test]
async fn test_unknown_verse_is_404() {
    let (_store, app) = setup().await;

    let (status, body): (_, ErrorResponse) = get_json(&app, "/verse?ref=Jude%201:99").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.code, 404);
}

#[tokio::test]
async fn test_missing_ref_is_400_without_store_call() {
    let (store, app) = setup().await;
    let calls = store.calls();

    let (status, _, _) = get(&app, "/verse").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get(&app, "/verse?ref=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(store.calls(), calls);
}

/// A repeated `ref` uses the first value.
#[tokio::test]
async fn test_repeated_ref_uses_first() {
    let (_store, app) = setup().await;

    let (status, verse): (_, Verse) =
        get_json(&app, "/verse?ref=John%203:16&ref=Genesis%201:1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(verse.reference, "John 3:16");
}

#[tokio::test]
async fn test_missing_ref_body_is_json() {
    let (_store, app) = setup().await;

    let (status, content_type, body) = get(&app, "/verse?verse=John%203:16").await;
    let body: ErrorResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "application/json");
    assert_eq!(body.code, 400);
    assert!(body.error.contains("ref"));
}

/// The verse exists but its related references cannot be read.
#[tokio::test]
async fn test_related_failure_is_500_not_partial_verse() {
    let (store, app) = setup().await;
    store.fail_on("related_verses");

    let (status, content_type, body) = get(&app, "/verse?ref=Genesis%201:1").await;
    let body: ErrorResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type, "application/json");
    assert_eq!(body.error, "Internal server error");
    assert_eq!(body.code, 500);
}

// =============================================================================
// Populated Places Tests
// =============================================================================

#[tokio::test]
async fn test_counties_in_state() {
    let (_store, app) = setup().await;

    let (status, counties): (_, Vec<County>) =
        get_json(&app, "/pop-places/state/TX/counties").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = counties.iter().map(|c| c.county.as_str()).collect();
    assert_eq!(names, vec!["McLennan", "Travis"]);
}

#[tokio::test]
async fn test_state_is_case_insensitive() {
    let (_store, app) = setup().await;

    for path in ["counties", "places"] {
        let (lower_status, _, lower) = get(&app, &format!("/pop-places/state/tx/{}", path)).await;
        let (upper_status, _, upper) = get(&app, &format!("/pop-places/state/TX/{}", path)).await;

        assert_eq!(lower_status, StatusCode::OK);
        assert_eq!(upper_status, StatusCode::OK);
        assert_eq!(lower, upper);
        assert_ne!(lower, b"[]".to_vec());
    }
}

#[tokio::test]
async fn test_county_is_case_insensitive() {
    let (_store, app) = setup().await;

    let (_, places): (_, Vec<Place>) = get_json(&app, "/pop-places/county/TXS_Travis/places").await;

    let names: Vec<_> = places.iter().map(|p| p.place.as_str()).collect();
    assert_eq!(names, vec!["Austin", "Manor"]);
}

#[tokio::test]
async fn test_places_in_state_ordered_by_name() {
    let (_store, app) = setup().await;

    let (_, places): (_, Vec<Place>) = get_json(&app, "/pop-places/state/tx/places").await;

    let ids: Vec<_> = places.iter().map(|p| p.place_id).collect();
    assert_eq!(ids, vec![7, 3, 11]);
}

/// Unknown keys give 200 with an empty array, not 404.
#[tokio::test]
async fn test_empty_lists_are_200() {
    let (_store, app) = setup().await;

    for uri in [
        "/pop-places/state/ZZ/counties",
        "/pop-places/state/ZZ/places",
        "/pop-places/county/zzz_nowhere/places",
    ] {
        let (status, content_type, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(content_type, "application/json");
        assert_eq!(body, b"[]".to_vec(), "{}", uri);
    }
}

#[tokio::test]
async fn test_place_detail() {
    let (_store, app) = setup().await;

    let (status, detail): (_, PlaceDetail) = get_json(&app, "/pop-places/place/7").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail, place(7, "Austin", "Travis", "txs_travis", "TX"));
}

#[tokio::test]
async fn test_unknown_place_is_404() {
    let (_store, app) = setup().await;

    let (status, body): (_, ErrorResponse) = get_json(&app, "/pop-places/place/42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.error.contains("42"));
}

/// A non-integer id is rejected before the store is touched.
#[tokio::test]
async fn test_non_integer_place_is_400_without_store_call() {
    let (store, app) = setup().await;
    let calls = store.calls();

    for uri in ["/pop-places/place/abc", "/pop-places/place/4.2"] {
        let (status, body): (_, ErrorResponse) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, 400);
    }

    assert_eq!(store.calls(), calls);
}

/// Undecodable path segments get the JSON error body, not axum's text.
#[tokio::test]
async fn test_invalid_utf8_path_is_json_400() {
    let (store, app) = setup().await;
    let calls = store.calls();

    for uri in [
        "/pop-places/place/%FF",
        "/pop-places/state/%FF/counties",
        "/pop-places/county/%C3%28/places",
    ] {
        let (status, content_type, body) = get(&app, uri).await;
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(content_type, "application/json", "{}", uri);
        assert_eq!(body.code, 400);
    }

    assert_eq!(store.calls(), calls);
}

// =============================================================================
// GeoJSON Cache Tests
// =============================================================================

/// Repeated requests return identical bytes without querying again.
#[tokio::test]
async fn test_geojson_served_from_cache() {
    let (store, app) = setup().await;
    let calls = store.calls();

    let (status, content_type, first) = get(&app, "/geo/north-america").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    assert_eq!(first, GEOJSON.as_bytes().to_vec());

    store.set_geojson(r#"{"type":"FeatureCollection","features":[]}"#);

    let (_, _, second) = get(&app, "/geo/north-america").await;
    assert_eq!(first, second);
    assert_eq!(store.calls(), calls);
}

#[tokio::test]
async fn test_geojson_refresh_is_visible() {
    let memory = Arc::new(fixture_store());
    let store: Arc<dyn DataStore> = memory.clone();
    let cache = GeoJsonCache::build(store.as_ref()).await.unwrap();
    let ctx = AppContext::new(store.clone(), cache.clone());
    let app = HttpServer::new(HttpServerConfig::default(), ctx).router();

    memory.set_geojson("{}");
    cache.refresh(store.as_ref()).await.unwrap();

    let (_, _, body) = get(&app, "/geo/north-america").await;
    assert_eq!(body, b"{}".to_vec());
}

// =============================================================================
// Failure and Routing Tests
// =============================================================================

/// Store failures are 500 with no driver detail in the body.
#[tokio::test]
async fn test_store_failure_is_500() {
    let (store, app) = setup().await;
    store.set_failing(true);

    for uri in [
        "/verse?ref=John%203:16",
        "/pop-places/state/TX/counties",
        "/pop-places/county/txs_travis/places",
        "/pop-places/state/TX/places",
        "/pop-places/place/7",
    ] {
        let (status, body): (_, ErrorResponse) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(body.error, "Internal server error");
        assert!(!body.error.contains("unavailable"));
    }

    // Cached payload survives a failing store.
    let (status, _, _) = get(&app, "/geo/north-america").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unmatched_path_is_404() {
    let (_store, app) = setup().await;

    let (status, body): (_, ErrorResponse) = get_json(&app, "/presbyterians/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.error.contains("/presbyterians/"));
}

#[tokio::test]
async fn test_geojson_failure_at_boot_is_fatal() {
    let store = fixture_store();
    store.fail_on("north_america_geojson");

    assert!(AppContext::build(Arc::new(store)).await.is_err());
}

#[tokio::test]
async fn test_health_and_index() {
    let (_store, app) = setup().await;

    let (status, _, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let (status, index): (_, serde_json::Value) = get_json(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(index
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["path"] == "/geo/north-america"));
}
