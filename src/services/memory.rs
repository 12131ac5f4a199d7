use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::predicate::ListingPredicate;
use crate::models::{Listing, ListingId, ListingSummary, NewListing};
use crate::services::store::{ListingStore, StoreError};

/// Listing store kept in process memory
///
/// Listings are held in insertion order and the predicate is evaluated
/// with a linear scan. Used by the test suite and when the service runs
/// without a database.
#[derive(Debug, Default)]
pub struct InMemoryListingStore {
    listings: RwLock<Vec<Listing>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already persisted listing as-is, bypassing ingestion
    pub async fn seed(&self, listing: Listing) {
        self.listings.write().await.push(listing);
    }

    pub async fn len(&self) -> usize {
        self.listings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.listings.read().await.is_empty()
    }

    pub async fn get(&self, id: ListingId) -> Option<Listing> {
        self.listings
            .read()
            .await
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn insert(&self, listing: NewListing) -> Result<ListingId, StoreError> {
        let id = ListingId::new();
        self.listings
            .write()
            .await
            .push(Listing::from_new(id, listing));

        tracing::debug!("Stored listing {} in memory", id);

        Ok(id)
    }

    async fn find(
        &self,
        predicate: &ListingPredicate,
        limit: usize,
    ) -> Result<Vec<ListingSummary>, StoreError> {
        let listings = self.listings.read().await;

        Ok(listings
            .iter()
            .filter(|l| predicate.matches(l))
            .take(limit)
            .map(Listing::summary)
            .collect())
    }
}
