//! Statement Registry
//!
//! Maps a logical handler name to its SQL template. Every template is
//! prepared once at startup so the process never serves traffic with a
//! statement the database rejects. Pooled connections then reuse the
//! prepared form through deadpool's per-connection statement cache.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use super::errors::{StoreError, StoreResult};

/// Named SQL templates shared by every handler
#[derive(Debug, Default)]
pub struct StatementRegistry {
    statements: BTreeMap<&'static str, &'static str>,
    closed: AtomicBool,
}

impl StatementRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under a unique name
    pub fn register(&mut self, name: &'static str, sql: &'static str) -> StoreResult<()> {
        if self.statements.contains_key(name) {
            return Err(StoreError::DuplicateStatement(name.to_string()));
        }
        self.statements.insert(name, sql);
        Ok(())
    }

    /// Look up a template by name
    pub fn get(&self, name: &str) -> StoreResult<&'static str> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        self.statements
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::UnknownStatement(name.to_string()))
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.statements.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Prepare every template on the given connection.
    ///
    /// The first failure is returned with the statement name attached;
    /// callers treat it as fatal.
    pub async fn prepare_all(&self, client: &deadpool_postgres::Client) -> StoreResult<()> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        for (name, sql) in &self.statements {
            client
                .prepare_cached(sql)
                .await
                .map_err(|source| StoreError::Prepare {
                    name: (*name).to_string(),
                    source,
                })?;
            debug!(statement = *name, "prepared statement");
        }
        info!(count = self.statements.len(), "all statements prepared");
        Ok(())
    }

    /// Close the registry. Later lookups fail with [`StoreError::Closed`].
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!(count = self.statements.len(), "statement registry closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
