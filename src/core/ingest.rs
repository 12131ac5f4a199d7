use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use crate::models::{is_valid_coordinate, Category, ListingDraft, ListingId, NewListing, PostalAddress, Urgency};
use crate::services::{AddressResolver, ListingStore, StoreError};

/// Why a draft was not turned into a listing
#[derive(Debug, Error)]
pub enum IngestError {
    /// Missing or malformed input, detected before any external call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The address was present but could not be resolved to coordinates
    #[error("Could not geocode address: {0}")]
    Geocode(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Write path: validate, geocode, persist
///
/// Nothing reaches the store unless the address resolved.
/// Re-submitting the same draft creates a second listing.
#[derive(Clone)]
pub struct ListingIngestor {
    resolver: Arc<dyn AddressResolver>,
    store: Arc<dyn ListingStore>,
}

impl ListingIngestor {
    pub fn new(resolver: Arc<dyn AddressResolver>, store: Arc<dyn ListingStore>) -> Self {
        Self { resolver, store }
    }

    pub async fn ingest(&self, draft: ListingDraft) -> Result<ListingId, IngestError> {
        draft
            .validate()
            .map_err(|e| IngestError::Validation(e.to_string()))?;

        let category = required(draft.category, "category")?
            .parse::<Category>()
            .map_err(|e| IngestError::Validation(e.to_string()))?;
        let urgency = required(draft.urgency, "urgency")?
            .parse::<Urgency>()
            .map_err(|e| IngestError::Validation(e.to_string()))?;

        let address = PostalAddress {
            line1: required(draft.address_line1, "addressLine1")?,
            postal_code: required(draft.postal_code, "postalCode")?,
            city: required(draft.city, "city")?,
            country: required(draft.country, "country")?,
        };
        let title = required(draft.title, "title")?;
        let description = required(draft.description, "description")?;

        let address_text = address.to_query();

        let location = self
            .resolver
            .resolve(&address_text)
            .await
            .filter(|p| is_valid_coordinate(p.y(), p.x()))
            .ok_or_else(|| IngestError::Geocode(address_text.clone()))?;

        let listing = NewListing {
            category,
            title,
            description,
            urgency,
            money: draft.money,
            address,
            address_text,
            location,
            created_at: chrono::Utc::now(),
        };

        let id = self.store.insert(listing).await?;

        tracing::info!("Created listing {} ({}, {})", id, category, urgency);

        Ok(id)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, IngestError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| IngestError::Validation(format!("{} is required", field)))
}
