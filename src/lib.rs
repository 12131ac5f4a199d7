//! Request Board - geotagged service-request listings
//!
//! The write path turns a structured postal address into coordinates before a
//! listing is stored; the read path filters listings by category, urgency,
//! money range and a map viewport that may cross the antimeridian.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{FilterEngine, FilterQuery, GeoBounds, IngestError, ListingIngestor, MAX_RESULTS};
pub use crate::models::{Category, Listing, ListingDraft, ListingId, ListingSummary, Urgency};
pub use crate::services::{AddressResolver, ListingStore, StoreError};
