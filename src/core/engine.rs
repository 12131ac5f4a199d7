use std::sync::Arc;

use crate::core::filters::FilterQuery;
use crate::models::ListingSummary;
use crate::services::{ListingStore, StoreError};

/// Upper bound on the number of listings returned by one query
pub const MAX_RESULTS: usize = 500;

/// Read path: compile the filter, query the store, sanitize and cap
///
/// Results come back in store order. An empty result is not an error.
#[derive(Clone)]
pub struct FilterEngine {
    store: Arc<dyn ListingStore>,
}

impl FilterEngine {
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    pub async fn query(&self, filter: &FilterQuery) -> Result<Vec<ListingSummary>, StoreError> {
        let predicate = filter.compile();

        let rows = self.store.find(&predicate, MAX_RESULTS).await?;
        let fetched = rows.len();

        // Second line of defense: rows written outside ingestion may lack coordinates
        let mut items: Vec<ListingSummary> = rows
            .into_iter()
            .filter(ListingSummary::has_valid_coordinates)
            .collect();

        if items.len() < fetched {
            tracing::warn!(
                "Dropped {} listings with non-finite coordinates",
                fetched - items.len()
            );
        }

        items.truncate(MAX_RESULTS);

        tracing::debug!(
            "Filter {:?} matched {} listings ({} terms)",
            filter,
            items.len(),
            predicate.terms.len()
        );

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bounds::GeoBounds;
    use crate::models::{Category, Listing, ListingId, PostalAddress, Urgency};
    use crate::services::InMemoryListingStore;
    use chrono::Utc;

    fn listing(category: Category, money: Option<f64>, lat: f64, lon: f64) -> Listing {
        Listing {
            id: ListingId::new(),
            category,
            title: format!("{} at {},{}", category, lat, lon),
            description: "desc".to_string(),
            urgency: Urgency::Medium,
            money,
            address: PostalAddress {
                line1: "Main St 1".to_string(),
                postal_code: "00-001".to_string(),
                city: "Warsaw".to_string(),
                country: "Poland".to_string(),
            },
            address_text: "Main St 1, 00-001 Warsaw, Poland".to_string(),
            latitude: lat,
            longitude: lon,
            created_at: Utc::now(),
        }
    }

    async fn engine_with(listings: Vec<Listing>) -> FilterEngine {
        let store = Arc::new(InMemoryListingStore::new());
        for l in listings {
            store.seed(l).await;
        }
        FilterEngine::new(store)
    }

    fn longitudes(items: &[ListingSummary]) -> Vec<f64> {
        items.iter().map(|i| i.longitude).collect()
    }

    #[tokio::test]
    async fn test_antimeridian_viewport() {
        let engine = engine_with(vec![
            listing(Category::Other, None, 0.0, 175.0),
            listing(Category::Other, None, 0.0, 0.0),
            listing(Category::Other, None, 0.0, -175.0),
        ])
        .await;

        let wrapped = FilterQuery {
            bounds: Some(GeoBounds::new(-10.0, 170.0, 10.0, -170.0)),
            ..Default::default()
        };
        assert_eq!(longitudes(&engine.query(&wrapped).await.unwrap()), vec![175.0, -175.0]);

        let normal = FilterQuery {
            bounds: Some(GeoBounds::new(-10.0, -170.0, 10.0, 170.0)),
            ..Default::default()
        };
        assert_eq!(longitudes(&engine.query(&normal).await.unwrap()), vec![0.0]);
    }

    #[tokio::test]
    async fn test_latitude_always_bounded() {
        let engine = engine_with(vec![
            listing(Category::Other, None, 20.0, 175.0),
            listing(Category::Other, None, 5.0, 175.0),
        ])
        .await;

        let wrapped = FilterQuery {
            bounds: Some(GeoBounds::new(-10.0, 170.0, 10.0, -170.0)),
            ..Default::default()
        };
        let items = engine.query(&wrapped).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].latitude, 5.0);
    }

    #[tokio::test]
    async fn test_money_bounds_exclude_absent_money() {
        let engine = engine_with(vec![
            listing(Category::Repair, None, 0.0, 0.0),
            listing(Category::Repair, Some(50.0), 0.0, 0.0),
            listing(Category::Repair, Some(500.0), 0.0, 0.0),
        ])
        .await;

        let unbounded = engine.query(&FilterQuery::default()).await.unwrap();
        assert_eq!(unbounded.len(), 3);

        let min_only = FilterQuery {
            min_money: Some(0.0),
            ..Default::default()
        };
        let items = engine.query(&min_only).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.money.is_some()));

        let max_only = FilterQuery {
            max_money: Some(100.0),
            ..Default::default()
        };
        let items = engine.query(&max_only).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].money, Some(50.0));
    }

    #[tokio::test]
    async fn test_non_finite_rows_dropped() {
        let engine = engine_with(vec![
            listing(Category::Other, None, f64::NAN, 0.0),
            listing(Category::Other, None, 1.0, f64::INFINITY),
            listing(Category::Other, None, 1.0, 1.0),
        ])
        .await;

        let items = engine.query(&FilterQuery::default()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].latitude, 1.0);
    }

    #[tokio::test]
    async fn test_result_cap() {
        let listings = (0..600)
            .map(|i| listing(Category::Cleaning, None, 0.0, (i % 360) as f64 - 180.0))
            .collect();
        let engine = engine_with(listings).await;

        let items = engine.query(&FilterQuery::default()).await.unwrap();
        assert_eq!(items.len(), MAX_RESULTS);
    }

    #[tokio::test]
    async fn test_no_match_is_empty_success() {
        let engine = engine_with(vec![listing(Category::Repair, None, 0.0, 0.0)]).await;

        let filter = FilterQuery {
            category: Some("Gardening".to_string()),
            ..Default::default()
        };
        assert!(engine.query(&filter).await.unwrap().is_empty());
    }
}
