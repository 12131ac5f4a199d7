use crate::models::Listing;

/// Listing attribute a predicate term can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    Urgency,
    Money,
    Latitude,
    Longitude,
}

impl Field {
    /// Column name in the `listings` table
    pub fn column(&self) -> &'static str {
        match self {
            Field::Category => "category",
            Field::Urgency => "urgency",
            Field::Money => "money",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
        }
    }
}

/// A single condition of a compiled filter
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Exact string match
    Equals { field: Field, value: String },
    /// Inclusive numeric range; a missing side is unbounded.
    /// An absent value never satisfies a range.
    Range {
        field: Field,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Logical OR of the nested terms
    Any(Vec<Term>),
}

impl Term {
    pub fn equals(field: Field, value: impl Into<String>) -> Self {
        Term::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn range(field: Field, min: Option<f64>, max: Option<f64>) -> Self {
        Term::Range { field, min, max }
    }

    /// Evaluate this term against a listing held in memory
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Term::Equals { field, value } => {
                text_value(listing, *field).is_some_and(|v| v == value.as_str())
            }
            Term::Range { field, min, max } => match numeric_value(listing, *field) {
                Some(v) => {
                    min.map_or(true, |min| v >= min) && max.map_or(true, |max| v <= max)
                }
                None => false,
            },
            Term::Any(terms) => terms.iter().any(|t| t.matches(listing)),
        }
    }
}

fn text_value(listing: &Listing, field: Field) -> Option<&'static str> {
    match field {
        Field::Category => Some(listing.category.as_str()),
        Field::Urgency => Some(listing.urgency.as_str()),
        _ => None,
    }
}

fn numeric_value(listing: &Listing, field: Field) -> Option<f64> {
    match field {
        Field::Money => listing.money,
        Field::Latitude => Some(listing.latitude),
        Field::Longitude => Some(listing.longitude),
        _ => None,
    }
}

/// Conjunction of terms; an empty predicate matches everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPredicate {
    pub terms: Vec<Term>,
}

impl ListingPredicate {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, term: Term) -> Self {
        self.terms.push(term);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn matches(&self, listing: &Listing) -> bool {
        self.terms.iter().all(|t| t.matches(listing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ListingId, PostalAddress, Urgency};
    use chrono::Utc;

    fn listing(money: Option<f64>, lat: f64, lon: f64) -> Listing {
        Listing {
            id: ListingId::new(),
            category: Category::Cleaning,
            title: "Windows".to_string(),
            description: "Clean windows".to_string(),
            urgency: Urgency::Low,
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

    #[test]
    fn test_empty_predicate_matches_everything() {
        assert!(ListingPredicate::all().matches(&listing(None, 0.0, 0.0)));
    }

    #[test]
    fn test_equals_is_exact() {
        let l = listing(None, 0.0, 0.0);
        assert!(Term::equals(Field::Category, "Cleaning").matches(&l));
        assert!(!Term::equals(Field::Category, "cleaning").matches(&l));
        assert!(Term::equals(Field::Urgency, "low").matches(&l));
        assert!(!Term::equals(Field::Urgency, "high").matches(&l));
    }

    #[test]
    fn test_range_is_inclusive() {
        let l = listing(Some(100.0), 0.0, 0.0);
        assert!(Term::range(Field::Money, Some(100.0), Some(100.0)).matches(&l));
        assert!(Term::range(Field::Money, None, Some(100.0)).matches(&l));
        assert!(Term::range(Field::Money, Some(100.0), None).matches(&l));
        assert!(!Term::range(Field::Money, Some(100.01), None).matches(&l));
    }

    #[test]
    fn test_range_excludes_absent_value() {
        let l = listing(None, 0.0, 0.0);
        assert!(!Term::range(Field::Money, Some(0.0), None).matches(&l));
        assert!(!Term::range(Field::Money, None, Some(1_000_000.0)).matches(&l));
    }

    #[test]
    fn test_range_excludes_nan() {
        let l = listing(None, f64::NAN, 0.0);
        assert!(!Term::range(Field::Latitude, Some(-90.0), Some(90.0)).matches(&l));
    }

    #[test]
    fn test_any_is_disjunction() {
        let l = listing(None, 0.0, 175.0);
        let term = Term::Any(vec![
            Term::range(Field::Longitude, Some(170.0), Some(180.0)),
            Term::range(Field::Longitude, Some(-180.0), Some(-170.0)),
        ]);
        assert!(term.matches(&l));
        assert!(!Term::Any(vec![]).matches(&l));
    }
}
