use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Store-assigned listing identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub Uuid);

impl ListingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of service being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Cleaning,
    Repair,
    Construction,
    Gardening,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Cleaning,
        Category::Repair,
        Category::Construction,
        Category::Gardening,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cleaning => "Cleaning",
            Category::Repair => "Repair",
            Category::Construction => "Construction",
            Category::Gardening => "Gardening",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Urgency tier of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            _ => Err(UnknownVariant {
                kind: "urgency",
                value: s.to_string(),
            }),
        }
    }
}

/// A string that does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Structured postal address as entered by the author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "addressLine1")]
    pub line1: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

impl PostalAddress {
    /// Single-line form handed to the geocoder: `line1, postcode city, country`
    pub fn to_query(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.line1, self.postal_code, self.city, self.country
        )
    }
}

/// Returns true for a finite WGS-84 coordinate pair
#[inline]
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// A fully resolved listing ready to be written to the store
///
/// Only constructed by ingestion after the address resolved, so the
/// coordinates are always finite and in range.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub urgency: Urgency,
    pub money: Option<f64>,
    pub address: PostalAddress,
    pub address_text: String,
    pub location: Point<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl NewListing {
    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }
}

/// A persisted listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub urgency: Urgency,
    pub money: Option<f64>,
    #[serde(flatten)]
    pub address: PostalAddress,
    #[serde(rename = "addressText")]
    pub address_text: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Listing {
    pub fn from_new(id: ListingId, new: NewListing) -> Self {
        Self {
            id,
            latitude: new.latitude(),
            longitude: new.longitude(),
            category: new.category,
            title: new.title,
            description: new.description,
            urgency: new.urgency,
            money: new.money,
            address: new.address,
            address_text: new.address_text,
            created_at: new.created_at,
        }
    }

    /// Projection returned by the read path
    pub fn summary(&self) -> ListingSummary {
        ListingSummary {
            id: self.id,
            title: self.title.clone(),
            category: self.category,
            urgency: self.urgency,
            money: self.money,
            latitude: self.latitude,
            longitude: self.longitude,
            address_text: self.address_text.clone(),
        }
    }
}

/// Read-path projection of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub id: ListingId,
    pub title: String,
    pub category: Category,
    pub urgency: Urgency,
    pub money: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "addressText")]
    pub address_text: String,
}

impl ListingSummary {
    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}
