// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    is_valid_coordinate, Category, Listing, ListingId, ListingSummary, NewListing, PostalAddress,
    UnknownVariant, Urgency,
};
pub use requests::{CreateListingRequest, ListingDraft, ListingQueryParams};
pub use responses::{CreateListingResponse, ErrorResponse, HealthResponse, ListingsResponse};
