//! # Data Store
//!
//! The seam between HTTP handlers and the relational database. Each
//! operation runs exactly one registered statement.
//!
//! - [`PgStore`] - PostgreSQL through a deadpool connection pool
//! - [`MemoryStore`] - fixture rows held in memory, used by tests

pub mod errors;
pub mod memory;
pub mod postgres;
pub mod queries;
pub mod registry;

use async_trait::async_trait;

use crate::models::{County, Place, PlaceDetail, VerseRow};

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use registry::StatementRegistry;

/// Read-only access to the reference database.
///
/// Lookups return `Ok(None)` for zero rows. Lists return every row in
/// query order, or an error; a list is never truncated by a failure
/// partway through the cursor.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// The verse with this exact reference
    async fn verse(&self, reference: &str) -> StoreResult<Option<VerseRow>>;

    /// References whose canonical reference is `reference`, excluding itself
    async fn related_verses(&self, reference: &str) -> StoreResult<Vec<String>>;

    /// The North America FeatureCollection as serialized GeoJSON
    async fn north_america_geojson(&self) -> StoreResult<String>;

    /// Counties in a state, ordered by name
    async fn counties_in_state(&self, state: &str) -> StoreResult<Vec<County>>;

    /// Places in a county, ordered by name
    async fn places_in_county(&self, county_ahcb: &str) -> StoreResult<Vec<Place>>;

    /// Places in a state, ordered by name
    async fn places_in_state(&self, state: &str) -> StoreResult<Vec<Place>>;

    /// A single place by id
    async fn place(&self, place_id: i32) -> StoreResult<Option<PlaceDetail>>;

    /// Release statements and connections
    async fn close(&self) {}
}
