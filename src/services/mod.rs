// Service exports
pub mod geocoder;
pub mod memory;
pub mod postgres;
pub mod store;

pub use geocoder::{AddressResolver, GeocodeError, GoogleGeocoder};
pub use memory::InMemoryListingStore;
pub use postgres::PostgresListingStore;
pub use store::{ListingStore, StoreError};
