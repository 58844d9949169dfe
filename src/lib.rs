//! dataapi - A read-only HTTP data API for historical and geographic
//! reference data
//!
//! Each endpoint binds one or two URL parameters to a fixed SQL statement,
//! runs it against PostgreSQL and serializes the rows as JSON or GeoJSON.

pub mod cache;
pub mod cli;
pub mod config;
pub mod context;
pub mod http_server;
pub mod logging;
pub mod models;
pub mod store;
