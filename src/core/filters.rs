use crate::core::bounds::GeoBounds;
use crate::core::predicate::{Field, ListingPredicate, Term};
use crate::models::ListingQueryParams;

/// Compound filter for the listing search
///
/// Every term is optional; present terms are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterQuery {
    pub category: Option<String>,
    pub urgency: Option<String>,
    pub min_money: Option<f64>,
    pub max_money: Option<f64>,
    pub bounds: Option<GeoBounds>,
}

impl FilterQuery {
    /// Build a filter from raw query parameters
    ///
    /// Empty values count as absent. Money bounds that are not finite numbers
    /// and malformed bounds are dropped instead of failing the request.
    pub fn from_params(params: &ListingQueryParams) -> Self {
        let bounds = non_empty(&params.bounds).and_then(|raw| {
            let parsed = GeoBounds::parse(raw);
            if parsed.is_none() {
                tracing::debug!("Ignoring malformed bounds: {:?}", raw);
            }
            parsed
        });

        Self {
            category: non_blank(&params.category).map(str::to_string),
            urgency: non_blank(&params.urgency).map(str::to_string),
            min_money: parse_money_bound(&params.min_money, "minMoney"),
            max_money: parse_money_bound(&params.max_money, "maxMoney"),
            bounds,
        }
    }

    pub fn has_money_bound(&self) -> bool {
        self.min_money.is_some() || self.max_money.is_some()
    }

    /// Compile into a store predicate
    pub fn compile(&self) -> ListingPredicate {
        let mut predicate = ListingPredicate::all();

        if let Some(category) = &self.category {
            predicate = predicate.and(Term::equals(Field::Category, category.as_str()));
        }

        if let Some(urgency) = &self.urgency {
            predicate = predicate.and(Term::equals(Field::Urgency, urgency.as_str()));
        }

        if self.has_money_bound() {
            predicate = predicate.and(Term::range(Field::Money, self.min_money, self.max_money));
        }

        if let Some(bounds) = &self.bounds {
            for term in bounds.to_terms() {
                predicate = predicate.and(term);
            }
        }

        predicate
    }
}

/// Exact-match values are kept verbatim; only the empty string is absent
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_money_bound(value: &Option<String>, name: &str) -> Option<f64> {
    let raw = non_empty(value)?;
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            tracing::debug!("Ignoring non-numeric {}: {:?}", name, raw);
            None
        }
    }
}
