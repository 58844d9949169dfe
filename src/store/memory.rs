//! In-memory store
//!
//! Holds fixture rows and answers the same questions the SQL statements
//! do, with the same ordering and case-sensitive matching. Every call is
//! counted so tests can assert whether a request reached the store.

use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::models::{County, Place, PlaceDetail, VerseRow};

use super::errors::{StoreError, StoreResult};
use super::DataStore;

/// Fixture-backed [`DataStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    verses: Vec<VerseRow>,
    /// (reference_id, reference_use) rows of the verse cleanup table
    verse_uses: Vec<(String, String)>,
    places: Vec<PlaceDetail>,
    geojson: RwLock<Option<String>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    failing_ops: RwLock<HashSet<&'static str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a verse. It is its own canonical reference.
    pub fn with_verse(mut self, reference: &str, text: &str) -> Self {
        self.verses.push(VerseRow {
            reference: reference.to_string(),
            text: text.to_string(),
        });
        self.verse_uses
            .push((reference.to_string(), reference.to_string()));
        self
    }

    /// Record that `reference` should be read as `canonical`
    pub fn with_related(mut self, reference: &str, canonical: &str) -> Self {
        self.verse_uses
            .push((reference.to_string(), canonical.to_string()));
        self
    }

    pub fn with_place(mut self, place: PlaceDetail) -> Self {
        self.places.push(place);
        self
    }

    pub fn with_geojson(self, geojson: impl Into<String>) -> Self {
        self.set_geojson(geojson);
        self
    }

    /// Replace the GeoJSON payload, as if the source table changed
    pub fn set_geojson(&self, geojson: impl Into<String>) {
        let mut slot = self.geojson.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(geojson.into());
    }

    /// Make every subsequent call fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make one operation fail, named after its trait method
    pub fn fail_on(&self, operation: &'static str) {
        let mut ops = self.failing_ops.write().unwrap_or_else(|e| e.into_inner());
        ops.insert(operation);
    }

    /// Number of store operations invoked so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, operation: &'static str) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let op_failing = self
            .failing_ops
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(operation);
        if op_failing || self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Fixture(format!("{} unavailable", operation)));
        }
        Ok(())
    }

    fn places_where<F>(&self, predicate: F) -> Vec<Place>
    where
        F: Fn(&PlaceDetail) -> bool,
    {
        let mut places: Vec<Place> = self
            .places
            .iter()
            .filter(|p| predicate(p))
            .map(PlaceDetail::summary)
            .collect();
        places.sort_by(|a, b| a.place.cmp(&b.place));
        places
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn verse(&self, reference: &str) -> StoreResult<Option<VerseRow>> {
        self.enter("verse")?;
        Ok(self
            .verses
            .iter()
            .find(|v| v.reference == reference)
            .cloned())
    }

    async fn related_verses(&self, reference: &str) -> StoreResult<Vec<String>> {
        self.enter("related_verses")?;
        let mut related: Vec<String> = self
            .verse_uses
            .iter()
            .filter(|(id, used)| used == reference && id != used)
            .map(|(id, _)| id.clone())
            .collect();
        related.sort();
        Ok(related)
    }

    async fn north_america_geojson(&self) -> StoreResult<String> {
        self.enter("north_america_geojson")?;
        let slot = self.geojson.read().unwrap_or_else(|e| e.into_inner());
        Ok(slot
            .clone()
            .unwrap_or_else(|| crate::cache::EMPTY_FEATURE_COLLECTION.to_string()))
    }

    async fn counties_in_state(&self, state: &str) -> StoreResult<Vec<County>> {
        self.enter("counties_in_state")?;
        let distinct: BTreeSet<(String, String)> = self
            .places
            .iter()
            .filter(|p| p.state == state)
            .map(|p| (p.county.clone(), p.county_ahcb.clone()))
            .collect();
        Ok(distinct
            .into_iter()
            .map(|(county, county_ahcb)| County {
                county_ahcb,
                county,
            })
            .collect())
    }

    async fn places_in_county(&self, county_ahcb: &str) -> StoreResult<Vec<Place>> {
        self.enter("places_in_county")?;
        Ok(self.places_where(|p| p.county_ahcb == county_ahcb))
    }

    async fn places_in_state(&self, state: &str) -> StoreResult<Vec<Place>> {
        self.enter("places_in_state")?;
        Ok(self.places_where(|p| p.state == state))
    }

    async fn place(&self, place_id: i32) -> StoreResult<Option<PlaceDetail>> {
        self.enter("place")?;
        Ok(self.places.iter().find(|p| p.place_id == place_id).cloned())
    }
}
