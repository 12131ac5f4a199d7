use async_trait::async_trait;
use geo::Point;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::is_valid_coordinate;

/// Turns a free-text postal address into coordinates
///
/// `None` is an ordinary outcome meaning the address could not be resolved.
/// Resolved points are `(x = longitude, y = latitude)` and always valid
/// WGS-84 coordinates.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, address: &str) -> Option<Point<f64>>;
}

/// Reasons a geocoding lookup produced no coordinates
///
/// Callers only see `None`; these exist for logging.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Provider returned status {0}")]
    Status(StatusCode),

    #[error("No geocoding API key configured")]
    MissingApiKey,

    #[error("No candidates for address (provider status: {0})")]
    NoResults(String),

    #[error("First candidate has no location")]
    MissingGeometry,

    #[error("Provider returned invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { lat: f64, lng: f64 },
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeCandidate>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    location: Option<LatLng>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Google Geocoding API client
///
/// One GET per address, first candidate only, no retries and no caching.
pub struct GoogleGeocoder {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl GoogleGeocoder {
    pub const DEFAULT_ENDPOINT: &'static str = "https://maps.googleapis.com/maps/api/geocode/json";

    /// Create a new geocoder
    ///
    /// Without `timeout` the transport default applies.
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, GeocodeError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint,
            api_key: api_key.filter(|k| !k.is_empty()),
            client: builder.build()?,
        })
    }

    /// Look up the first candidate for an address
    pub async fn lookup(&self, address: &str) -> Result<Point<f64>, GeocodeError> {
        let api_key = self.api_key.as_deref().ok_or(GeocodeError::MissingApiKey)?;

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let body: GeocodeResponse = response.json().await?;

        let candidate = body.results.into_iter().next().ok_or_else(|| {
            GeocodeError::NoResults(body.status.unwrap_or_else(|| "unknown".to_string()))
        })?;

        let location = candidate
            .geometry
            .and_then(|g| g.location)
            .or(candidate.location)
            .ok_or(GeocodeError::MissingGeometry)?;

        if !is_valid_coordinate(location.lat, location.lng) {
            return Err(GeocodeError::InvalidCoordinates {
                lat: location.lat,
                lng: location.lng,
            });
        }

        Ok(Point::new(location.lng, location.lat))
    }
}

#[async_trait]
impl AddressResolver for GoogleGeocoder {
    async fn resolve(&self, address: &str) -> Option<Point<f64>> {
        match self.lookup(address).await {
            Ok(point) => {
                tracing::debug!("Geocoded {:?} to ({}, {})", address, point.y(), point.x());
                Some(point)
            }
            Err(e @ (GeocodeError::RequestError(_) | GeocodeError::Status(_))) => {
                tracing::warn!("Geocoding provider failure for {:?}: {}", address, e);
                None
            }
            Err(e) => {
                tracing::info!("Could not geocode {:?}: {}", address, e);
                None
            }
        }
    }
}
