//! Store error types

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while talking to the relational store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not obtain a pooled connection
    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// Query execution or row scan failed
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A registered statement failed to prepare at startup
    #[error("Failed to prepare statement '{name}': {source}")]
    Prepare {
        name: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// No statement registered under this name
    #[error("Unknown statement: {0}")]
    UnknownStatement(String),

    /// Statement name registered twice
    #[error("Statement already registered: {0}")]
    DuplicateStatement(String),

    /// The registry has been closed for shutdown
    #[error("Statement registry is closed")]
    Closed,

    /// Invalid database configuration
    #[error("Database configuration error: {0}")]
    Config(String),

    /// Failure injected by a fixture store
    #[error("Fixture failure: {0}")]
    Fixture(String),
}
