use async_trait::async_trait;
use thiserror::Error;

use crate::core::predicate::ListingPredicate;
use crate::models::{ListingId, ListingSummary, NewListing};

/// Errors that can occur when reading or writing listings
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

/// Persistence collaborator shared by ingestion and the filter engine
///
/// Implementations must make an inserted listing visible to every
/// `find` that starts after `insert` returns.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Persist a resolved listing and return its new identifier
    async fn insert(&self, listing: NewListing) -> Result<ListingId, StoreError>;

    /// Return at most `limit` listings matching `predicate`, in insertion order
    async fn find(
        &self,
        predicate: &ListingPredicate,
        limit: usize,
    ) -> Result<Vec<ListingSummary>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
