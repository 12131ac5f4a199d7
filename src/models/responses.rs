use serde::{Deserialize, Serialize};
use crate::models::domain::{ListingId, ListingSummary};

/// Response for the listing search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingsResponse {
    pub items: Vec<ListingSummary>,
}

/// Response for a successfully created listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListingResponse {
    pub message: String,
    pub id: ListingId,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
