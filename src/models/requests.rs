use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Draft of a new listing as submitted by the author
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a validation failure instead of a JSON parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(required, length(min = 1))]
    pub category: Option<String>,
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    #[validate(required, length(min = 1))]
    pub urgency: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default, deserialize_with = "deserialize_money")]
    pub money: Option<f64>,
    #[validate(required, length(min = 1))]
    #[serde(rename = "addressLine1", alias = "address_line1")]
    pub address_line1: Option<String>,
    #[validate(required, length(min = 1))]
    pub city: Option<String>,
    #[validate(required, length(min = 1))]
    #[serde(rename = "postalCode", alias = "postal_code")]
    pub postal_code: Option<String>,
    #[validate(required, length(min = 1))]
    pub country: Option<String>,
}

pub type ListingDraft = CreateListingRequest;

/// Accepts a number, a numeric string, an empty string or null.
///
/// Empty strings and null both mean "not specified"; they never become zero.
fn deserialize_money<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MoneyInput {
        Number(f64),
        Text(String),
    }

    match Option::<MoneyInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(MoneyInput::Number(n)) => Ok(Some(n)),
        Some(MoneyInput::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid money amount: {}", s)))
        }
    }
}

/// Query string of the listing search endpoint
///
/// Values stay raw strings; the filter engine decides what is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingQueryParams {
    pub category: Option<String>,
    pub urgency: Option<String>,
    #[serde(rename = "minMoney", alias = "min_money")]
    pub min_money: Option<String>,
    #[serde(rename = "maxMoney", alias = "max_money")]
    pub max_money: Option<String>,
    /// `south,west,north,east`
    pub bounds: Option<String>,
}

impl ListingQueryParams {
    /// Collect known parameters from decoded query pairs
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "category" => &mut params.category,
                "urgency" => &mut params.urgency,
                "minMoney" | "min_money" => &mut params.min_money,
                "maxMoney" | "max_money" => &mut params.max_money,
                "bounds" => &mut params.bounds,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }

        params
    }
}
