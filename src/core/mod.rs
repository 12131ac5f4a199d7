// Core algorithm exports
pub mod bounds;
pub mod engine;
pub mod filters;
pub mod ingest;
pub mod predicate;

pub use bounds::GeoBounds;
pub use engine::{FilterEngine, MAX_RESULTS};
pub use filters::FilterQuery;
pub use ingest::{IngestError, ListingIngestor};
pub use predicate::{Field, ListingPredicate, Term};
