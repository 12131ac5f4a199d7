use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::{FilterEngine, FilterQuery, IngestError, ListingIngestor};
use crate::models::{
    CreateListingRequest, CreateListingResponse, ErrorResponse, HealthResponse,
    ListingQueryParams, ListingsResponse,
};
use crate::services::ListingStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ListingStore>,
    pub ingestor: ListingIngestor,
    pub engine: FilterEngine,
}

/// Configure all listing-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/listings", web::get().to(search_listings))
        .route("/listings", web::post().to(create_listing));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Search listings
///
/// GET /api/v1/listings?category=&urgency=&minMoney=&maxMoney=&bounds=south,west,north,east
///
/// Every parameter is optional. Malformed bounds are ignored and repeated
/// parameters keep their first value.
async fn search_listings(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> impl Responder {
    let params = ListingQueryParams::from_pairs(query.into_inner());
    let filter = FilterQuery::from_params(&params);

    match state.engine.query(&filter).await {
        Ok(items) => {
            tracing::info!("Returning {} listings", items.len());
            HttpResponse::Ok().json(ListingsResponse { items })
        }
        Err(e) => {
            tracing::error!("Listing search failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to query listings".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Create a listing
///
/// POST /api/v1/listings
///
/// Request body:
/// ```json
/// {
///   "category": "Repair",
///   "title": "string",
///   "description": "string",
///   "urgency": "low|medium|high",
///   "money": 150,
///   "addressLine1": "string",
///   "city": "string",
///   "postalCode": "string",
///   "country": "string"
/// }
/// ```
async fn create_listing(
    state: web::Data<AppState>,
    req: web::Json<CreateListingRequest>,
) -> impl Responder {
    match state.ingestor.ingest(req.into_inner()).await {
        Ok(id) => HttpResponse::Created().json(CreateListingResponse {
            message: "Listing created".to_string(),
            id,
        }),
        Err(IngestError::Validation(message)) => {
            tracing::info!("Rejected listing draft: {}", message);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Validation failed".to_string(),
                message,
                status_code: 400,
            })
        }
        Err(IngestError::Geocode(address)) => {
            tracing::info!("Rejected listing with unresolvable address: {}", address);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Geocoding failed".to_string(),
                message: format!("Could not geocode address: {}", address),
                status_code: 400,
            })
        }
        Err(e @ IngestError::Store(_)) => {
            tracing::error!("Failed to store listing: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to create listing".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
