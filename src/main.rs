use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use request_board::config::{LoggingSettings, Settings, StorageBackend};
use request_board::core::{FilterEngine, ListingIngestor};
use request_board::routes::{self, handle_json_payload_error, handle_query_payload_error, listings::AppState};
use request_board::services::{
    AddressResolver, GoogleGeocoder, InMemoryListingStore, ListingStore, PostgresListingStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// Initialize tracing; `LOG_LEVEL` and `LOG_FORMAT` override the configured values
fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match log_format.as_str() {
        "json" => subscriber.json().init(),
        "pretty" => subscriber.pretty().init(),
        _ => subscriber.init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    info!("Starting request board service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Configuration loaded successfully");

    let store: Arc<dyn ListingStore> = match settings.storage.backend {
        StorageBackend::Postgres => {
            let db_max_conn = settings.database.max_connections.unwrap_or(10);
            let postgres = PostgresListingStore::from_settings(
                &settings.database.url,
                Some(db_max_conn),
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            info!("PostgreSQL listing store initialized (max: {} connections)", db_max_conn);
            Arc::new(postgres)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory listing store; listings are lost on restart");
            Arc::new(InMemoryListingStore::new())
        }
    };

    if !settings.geocoding.has_api_key() {
        warn!("No geocoding API key configured; every new listing will be rejected");
    }

    let geocoder = GoogleGeocoder::new(
        settings.geocoding.endpoint.clone(),
        settings.geocoding.api_key.clone(),
        settings.geocoding.timeout_secs.map(Duration::from_secs),
    )
    .map_err(|e| {
        error!("Failed to create geocoding client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let resolver: Arc<dyn AddressResolver> = Arc::new(geocoder);

    info!("Geocoder initialized ({})", settings.geocoding.endpoint);

    // Build application state
    let app_state = AppState {
        ingestor: ListingIngestor::new(resolver, store.clone()),
        engine: FilterEngine::new(store.clone()),
        store,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
