//! PostgreSQL store
//!
//! Queries go through a deadpool connection pool. Statements are looked up
//! by name in the [`StatementRegistry`] and prepared with `prepare_cached`,
//! so each pooled connection compiles a statement at most once.

use std::sync::Arc;

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use futures_util::{pin_mut, TryStreamExt};
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};
use tracing::{debug, info};

use crate::config::{DatabaseConfig, VerseFilter};
use crate::models::{County, Place, PlaceDetail, VerseRow};

use super::errors::{StoreError, StoreResult};
use super::queries;
use super::registry::StatementRegistry;
use super::DataStore;

/// Data store backed by PostgreSQL
pub struct PgStore {
    pool: Pool,
    registry: Arc<StatementRegistry>,
}

impl PgStore {
    /// Build the pool and prepare every registered statement.
    ///
    /// Fails if the database is unreachable or any statement is rejected.
    pub async fn connect(config: &DatabaseConfig, verse_filter: VerseFilter) -> StoreResult<Self> {
        let pg_config = config
            .url
            .parse::<tokio_postgres::Config>()
            .map_err(|e| StoreError::Config(format!("invalid database URL: {}", e)))?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(config.connect_timeout()))
            .create_timeout(Some(config.connect_timeout()))
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build pool: {}", e)))?;

        let registry = Arc::new(queries::standard_registry(verse_filter)?);

        let client = pool.get().await?;
        registry.prepare_all(&client).await?;
        drop(client);

        info!(
            max_connections = config.max_connections,
            statements = registry.len(),
            "database ready"
        );

        Ok(Self { pool, registry })
    }

    pub fn registry(&self) -> &StatementRegistry {
        &self.registry
    }

    /// Run a named statement expected to return at most one row
    async fn query_opt(
        &self,
        name: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StoreResult<Option<Row>> {
        let sql = self.registry.get(name)?;
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(sql).await?;
        debug!(statement = name, "query");
        Ok(client.query_opt(&stmt, params).await?)
    }

    /// Run a named statement and scan every row.
    ///
    /// Rows are streamed off the cursor; the first scan or cursor error
    /// discards everything read so far.
    async fn query_all<T, F>(
        &self,
        name: &str,
        params: &[&(dyn ToSql + Sync)],
        scan: F,
    ) -> StoreResult<Vec<T>>
    where
        F: Fn(&Row) -> Result<T, tokio_postgres::Error>,
    {
        let sql = self.registry.get(name)?;
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(sql).await?;
        debug!(statement = name, "query");

        let rows = client
            .query_raw(&stmt, params.iter().map(|p| *p as &dyn ToSql))
            .await?;
        pin_mut!(rows);

        let mut results = Vec::new();
        while let Some(row) = rows.try_next().await? {
            results.push(scan(&row)?);
        }
        Ok(results)
    }
}

fn scan_place(row: &Row) -> Result<Place, tokio_postgres::Error> {
    Ok(Place {
        place_id: row.try_get(0)?,
        place: row.try_get(1)?,
    })
}

#[async_trait]
impl DataStore for PgStore {
    async fn verse(&self, reference: &str) -> StoreResult<Option<VerseRow>> {
        let Some(row) = self.query_opt(queries::VERSE, &[&reference]).await? else {
            return Ok(None);
        };
        Ok(Some(VerseRow {
            reference: row.try_get(0)?,
            text: row.try_get(1)?,
        }))
    }

    async fn related_verses(&self, reference: &str) -> StoreResult<Vec<String>> {
        self.query_all(queries::RELATED_VERSES, &[&reference], |row| row.try_get(0))
            .await
    }

    async fn north_america_geojson(&self) -> StoreResult<String> {
        let geojson: Option<String> = match self.query_opt(queries::NORTH_AMERICA, &[]).await? {
            Some(row) => row.try_get(0)?,
            None => None,
        };
        Ok(geojson.unwrap_or_else(|| crate::cache::EMPTY_FEATURE_COLLECTION.to_string()))
    }

    async fn counties_in_state(&self, state: &str) -> StoreResult<Vec<County>> {
        self.query_all(queries::COUNTIES_IN_STATE, &[&state], |row| {
            Ok(County {
                county_ahcb: row.try_get(0)?,
                county: row.try_get(1)?,
            })
        })
        .await
    }

    async fn places_in_county(&self, county_ahcb: &str) -> StoreResult<Vec<Place>> {
        self.query_all(queries::PLACES_IN_COUNTY, &[&county_ahcb], scan_place)
            .await
    }

    async fn places_in_state(&self, state: &str) -> StoreResult<Vec<Place>> {
        self.query_all(queries::PLACES_IN_STATE, &[&state], scan_place)
            .await
    }

    async fn place(&self, place_id: i32) -> StoreResult<Option<PlaceDetail>> {
        let Some(row) = self.query_opt(queries::PLACE_DETAILS, &[&place_id]).await? else {
            return Ok(None);
        };
        Ok(Some(PlaceDetail {
            place_id: row.try_get(0)?,
            place: row.try_get(1)?,
            county: row.try_get(2)?,
            county_ahcb: row.try_get(3)?,
            state: row.try_get(4)?,
        }))
    }

    async fn close(&self) {
        self.registry.close();
        self.pool.close();
        info!("database pool closed");
    }
}
