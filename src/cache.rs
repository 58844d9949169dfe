//! Boot-time GeoJSON cache
//!
//! The North America FeatureCollection is built by the database once,
//! before the router is reachable, and served verbatim afterwards. Updates
//! to the source table stay invisible until restart unless a refresh
//! interval is configured.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::store::{DataStore, StoreResult};

/// Served when the source query matches nothing
pub const EMPTY_FEATURE_COLLECTION: &str = r#"{"type":"FeatureCollection","features":[]}"#;

/// A pre-serialized GeoJSON payload shared by every request.
///
/// Readers get a reference-counted view; the body is never copied.
#[derive(Clone)]
pub struct GeoJsonCache {
    payload: Arc<RwLock<Bytes>>,
}

impl GeoJsonCache {
    /// Query the store once and hold the result
    pub async fn build(store: &dyn DataStore) -> StoreResult<Self> {
        let payload = store.north_america_geojson().await?;
        info!(bytes = payload.len(), "north america geojson cached");
        Ok(Self::from_payload(payload))
    }

    pub fn from_payload(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: Arc::new(RwLock::new(payload.into())),
        }
    }

    /// The current payload
    pub async fn get(&self) -> Bytes {
        self.payload.read().await.clone()
    }

    /// Rebuild from the store. On failure the previous payload stays.
    pub async fn refresh(&self, store: &dyn DataStore) -> StoreResult<()> {
        let payload = store.north_america_geojson().await?;
        let len = payload.len();
        *self.payload.write().await = Bytes::from(payload);
        info!(bytes = len, "north america geojson refreshed");
        Ok(())
    }

    /// Rebuild on a fixed interval until the returned task is aborted.
    ///
    /// Returns `None` without spawning anything when `interval` is `None`.
    pub fn spawn_refresh(
        &self,
        store: Arc<dyn DataStore>,
        interval: Option<Duration>,
    ) -> Option<JoinHandle<()>> {
        let interval = interval?;
        let cache = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; the cache is already fresh.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = cache.refresh(store.as_ref()).await {
                    warn!(error = %e, "geojson refresh failed, keeping previous payload");
                }
            }
        }))
    }
}
