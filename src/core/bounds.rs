use crate::core::predicate::{Field, Term};

const MIN_LONGITUDE: f64 = -180.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Geographic viewport in degrees
///
/// `west > east` means the viewport crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Parse a comma-joined `south,west,north,east` string
    ///
    /// Returns `None` for anything other than exactly four finite numbers.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<f64> = raw
            .split(',')
            .map(|p| p.trim().parse::<f64>().ok().filter(|n| n.is_finite()))
            .collect::<Option<Vec<_>>>()?;

        match parts.as_slice() {
            [south, west, north, east] => Some(Self::new(*south, *west, *north, *east)),
            _ => None,
        }
    }

    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Predicate terms selecting listings inside this viewport
    ///
    /// Latitude is always a single range. Longitude splits into
    /// `[west, 180] OR [-180, east]` when the viewport wraps.
    pub fn to_terms(&self) -> Vec<Term> {
        let latitude = Term::range(Field::Latitude, Some(self.south), Some(self.north));

        let longitude = if self.crosses_antimeridian() {
            Term::Any(vec![
                Term::range(Field::Longitude, Some(self.west), Some(MAX_LONGITUDE)),
                Term::range(Field::Longitude, Some(MIN_LONGITUDE), Some(self.east)),
            ])
        } else {
            Term::range(Field::Longitude, Some(self.west), Some(self.east))
        };

        vec![latitude, longitude]
    }
}
