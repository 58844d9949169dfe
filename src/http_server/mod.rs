//! # HTTP Server Module
//!
//! Axum server exposing the reference data as JSON and GeoJSON.
//!
//! # Endpoints
//!
//! - `/verse?ref=` - A verse and its related references
//! - `/geo/north-america` - Cached country polygons
//! - `/pop-places/*` - 1926-1928 populated places by state and county
//! - `/health` - Health check
//! - `/` - Endpoint index

pub mod config;
pub mod errors;
pub mod extract;
pub mod geo_routes;
pub mod observability_routes;
pub mod pop_places_routes;
pub mod server;
pub mod verse_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use extract::{ApiPath, ApiQuery};
pub use server::HttpServer;
