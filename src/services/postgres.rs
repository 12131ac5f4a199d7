use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use uuid::Uuid;

use crate::core::predicate::{ListingPredicate, Term};
use crate::models::{ListingId, ListingSummary, NewListing};
use crate::services::store::{ListingStore, StoreError};

const SUMMARY_COLUMNS: &str =
    "id, title, category, urgency, money, latitude, longitude, address_text";

/// Row shape of the read-path projection
#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    title: String,
    category: String,
    urgency: String,
    money: Option<f64>,
    latitude: f64,
    longitude: f64,
    address_text: String,
}

impl TryFrom<SummaryRow> for ListingSummary {
    type Error = StoreError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(ListingSummary {
            id: ListingId(row.id),
            title: row.title,
            category: row
                .category
                .parse()
                .map_err(|e| StoreError::InvalidData(format!("listing {}: {}", row.id, e)))?,
            urgency: row
                .urgency
                .parse()
                .map_err(|e| StoreError::InvalidData(format!("listing {}: {}", row.id, e)))?,
            money: row.money,
            latitude: row.latitude,
            longitude: row.longitude,
            address_text: row.address_text,
        })
    }
}

/// PostgreSQL-backed listing store
pub struct PostgresListingStore {
    pool: PgPool,
}

impl PostgresListingStore {
    /// Connect to PostgreSQL and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

/// Append a `WHERE` clause for the predicate, if it has any terms
fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &ListingPredicate) {
    if predicate.is_empty() {
        return;
    }

    qb.push(" WHERE ");
    for (i, term) in predicate.terms.iter().enumerate() {
        if i > 0 {
            qb.push(" AND ");
        }
        push_term(qb, term);
    }
}

fn push_term(qb: &mut QueryBuilder<'_, Postgres>, term: &Term) {
    match term {
        Term::Equals { field, value } => {
            qb.push(field.column()).push(" = ").push_bind(value.clone());
        }
        Term::Range { field, min, max } => {
            // NULL never satisfies a range
            qb.push("(").push(field.column()).push(" IS NOT NULL");
            if let Some(min) = min {
                qb.push(" AND ").push(field.column()).push(" >= ").push_bind(*min);
            }
            if let Some(max) = max {
                qb.push(" AND ").push(field.column()).push(" <= ").push_bind(*max);
            }
            qb.push(")");
        }
        Term::Any(terms) if terms.is_empty() => {
            qb.push("FALSE");
        }
        Term::Any(terms) => {
            qb.push("(");
            for (i, t) in terms.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                push_term(qb, t);
            }
            qb.push(")");
        }
    }
}

/// Build the search statement for a predicate
fn find_query(predicate: &ListingPredicate, limit: usize) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM listings", SUMMARY_COLUMNS));
    push_predicate(&mut qb, predicate);
    qb.push(" ORDER BY seq ASC LIMIT ")
        .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    qb
}

#[async_trait]
impl ListingStore for PostgresListingStore {
    async fn insert(&self, listing: NewListing) -> Result<ListingId, StoreError> {
        let query = r#"
            INSERT INTO listings (
                category, title, description, urgency, money,
                address_line1, postal_code, city, country, address_text,
                latitude, longitude, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
        "#;

        let id: Uuid = sqlx::query_scalar(query)
            .bind(listing.category.as_str())
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.urgency.as_str())
            .bind(listing.money)
            .bind(&listing.address.line1)
            .bind(&listing.address.postal_code)
            .bind(&listing.address.city)
            .bind(&listing.address.country)
            .bind(&listing.address_text)
            .bind(listing.latitude())
            .bind(listing.longitude())
            .bind(listing.created_at)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Inserted listing {}", id);

        Ok(ListingId(id))
    }

    async fn find(
        &self,
        predicate: &ListingPredicate,
        limit: usize,
    ) -> Result<Vec<ListingSummary>, StoreError> {
        let mut qb = find_query(predicate, limit);
        tracing::debug!("Listing search: {}", qb.sql());

        let rows: Vec<SummaryRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter().map(ListingSummary::try_from).collect()
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
