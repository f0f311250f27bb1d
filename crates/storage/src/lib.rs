use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{MonitoredRow, Relationship, RelationshipId, RowId, RowPayload};
use thiserror::Error;

mod location;
mod rest;
mod sqlite;

pub use location::{parse_store_location, StoreLocation};
pub use rest::RestStore;
pub use sqlite::SqliteStore;

/// Zero-based inclusive row range, as used by range-based pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: u64,
    pub end: u64,
}

impl RowRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{message}")]
    Remote { status: u16, message: String },
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected store response: {0}")]
    Protocol(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("invalid store configuration: {0}")]
    Config(String),
}

/// Remote relational store holding relationships and their monitored rows.
///
/// Every read is scoped with `relationship_id = <value>`; every write is a
/// single independent call with no optimistic-concurrency check.
#[async_trait]
pub trait RelationalStore: Send + Sync {
    async fn count_rows(&self, relationship_id: RelationshipId) -> Result<u64, StoreError>;

    /// Rows of the scope within `range`, joined with the relationship name and
    /// ordered by creation time ascending.
    async fn fetch_rows(
        &self,
        relationship_id: RelationshipId,
        range: RowRange,
    ) -> Result<Vec<MonitoredRow>, StoreError>;

    async fn insert_row(&self, payload: &RowPayload) -> Result<(), StoreError>;

    async fn update_row(&self, id: RowId, payload: &RowPayload) -> Result<(), StoreError>;

    async fn delete_row(&self, id: RowId) -> Result<(), StoreError>;

    async fn list_relationships(&self) -> Result<Vec<Relationship>, StoreError>;
}

/// Opens the store a location points at. Hosted stores need an API key.
pub async fn open_store(
    location: &StoreLocation,
    api_key: Option<&str>,
) -> Result<Arc<dyn RelationalStore>, StoreError> {
    match location {
        StoreLocation::Sqlite(database_url) => {
            Ok(Arc::new(SqliteStore::new(database_url).await?))
        }
        StoreLocation::Rest(base_url) => {
            let api_key = api_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    StoreError::Config(format!("an API key is required for {base_url}"))
                })?;
            Ok(Arc::new(RestStore::new(base_url.clone(), api_key)))
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
