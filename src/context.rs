//! Server context
//!
//! Everything a handler needs, built once at startup and handed to the
//! router as state. Nothing here is mutated after construction except
//! through the cache's own lock.

use std::sync::Arc;

use crate::cache::GeoJsonCache;
use crate::store::{DataStore, StoreResult};

/// Shared state for every handler
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn DataStore>,
    pub geojson: GeoJsonCache,
}

impl AppContext {
    /// Build the context, running the boot-time GeoJSON query
    pub async fn build(store: Arc<dyn DataStore>) -> StoreResult<Self> {
        let geojson = GeoJsonCache::build(store.as_ref()).await?;
        Ok(Self { store, geojson })
    }

    /// Assemble from parts already built
    pub fn new(store: Arc<dyn DataStore>, geojson: GeoJsonCache) -> Self {
        Self { store, geojson }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};

    #[tokio::test]
    async fn test_build_fails_when_geojson_query_fails() {
        let store = MemoryStore::new().with_geojson(crate::cache::EMPTY_FEATURE_COLLECTION);
        store.fail_on("north_america_geojson");

        let result = AppContext::build(Arc::new(store)).await;
        assert!(matches!(result, Err(StoreError::Fixture(_))));
    }

    #[tokio::test]
    async fn test_build_caches_payload() {
        let store = MemoryStore::new().with_geojson("{}");
        let ctx = AppContext::build(Arc::new(store)).await.unwrap();
        assert_eq!(ctx.geojson.get().await, "{}");
    }
}
