// Unit tests for Request Board

use chrono::Utc;
use request_board::core::{
    bounds::GeoBounds,
    filters::FilterQuery,
    predicate::{Field, ListingPredicate, Term},
};
use request_board::models::{Category, Listing, ListingId, ListingQueryParams, PostalAddress, Urgency};

fn listing_at(lat: f64, lon: f64) -> Listing {
    Listing {
        id: ListingId::new(),
        category: Category::Repair,
        title: "Fix sink".to_string(),
        description: "Kitchen sink leaks".to_string(),
        urgency: Urgency::High,
        money: Some(150.0),
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

fn within(bounds: &str, listing: &Listing) -> bool {
    let filter = FilterQuery::from_params(&ListingQueryParams {
        bounds: Some(bounds.to_string()),
        ..Default::default()
    });
    filter.compile().matches(listing)
}

#[test]
fn test_wrapped_viewport_membership() {
    let east_of_dateline = listing_at(0.0, 175.0);
    let greenwich = listing_at(0.0, 0.0);

    assert!(within("-10,170,10,-170", &east_of_dateline));
    assert!(!within("-10,170,10,-170", &greenwich));
}

#[test]
fn test_normal_viewport_membership() {
    let east_of_dateline = listing_at(0.0, 175.0);
    let greenwich = listing_at(0.0, 0.0);

    assert!(!within("-10,-170,10,170", &east_of_dateline));
    assert!(within("-10,-170,10,170", &greenwich));
}

#[test]
fn test_wrapped_viewport_edges_inclusive() {
    assert!(within("-10,170,10,-170", &listing_at(0.0, 170.0)));
    assert!(within("-10,170,10,-170", &listing_at(0.0, 180.0)));
    assert!(within("-10,170,10,-170", &listing_at(0.0, -180.0)));
    assert!(within("-10,170,10,-170", &listing_at(0.0, -170.0)));
    assert!(within("-10,170,10,-170", &listing_at(10.0, -170.0)));
    assert!(!within("-10,170,10,-170", &listing_at(0.0, -169.9)));
    assert!(!within("-10,170,10,-170", &listing_at(10.1, 175.0)));
}

#[test]
fn test_warsaw_viewport() {
    let warsaw = listing_at(52.23, 21.01);
    assert!(within("52,20,53,22", &warsaw));
    assert!(!within("50,19,51,20", &warsaw));
}

#[test]
fn test_malformed_bounds_match_everything() {
    let anywhere = listing_at(-45.0, -120.0);
    for raw in ["a,b,c", "1,2,3", "1,2,3,4,5", "1,2,NaN,4", "x"] {
        assert!(within(raw, &anywhere), "bounds {:?} should be ignored", raw);
    }
}

#[test]
fn test_bounds_parse_round_numbers() {
    let bounds = GeoBounds::parse("52,20,53,22").unwrap();
    assert_eq!(bounds.south, 52.0);
    assert_eq!(bounds.west, 20.0);
    assert_eq!(bounds.north, 53.0);
    assert_eq!(bounds.east, 22.0);
    assert!(!bounds.crosses_antimeridian());
}

#[test]
fn test_money_absent_excluded_only_when_bounded() {
    let mut no_money = listing_at(0.0, 0.0);
    no_money.money = None;

    let unbounded = FilterQuery::default();
    let min_only = FilterQuery {
        min_money: Some(0.0),
        ..Default::default()
    };
    let max_only = FilterQuery {
        max_money: Some(1.0e9),
        ..Default::default()
    };

    assert!(unbounded.compile().matches(&no_money));
    assert!(!min_only.compile().matches(&no_money));
    assert!(!max_only.compile().matches(&no_money));
}

#[test]
fn test_terms_combine_with_and() {
    let listing = listing_at(52.23, 21.01);

    let predicate = ListingPredicate::all()
        .and(Term::equals(Field::Category, "Repair"))
        .and(Term::equals(Field::Urgency, "high"))
        .and(Term::range(Field::Money, Some(100.0), Some(200.0)));
    assert!(predicate.matches(&listing));

    let predicate = predicate.and(Term::equals(Field::Urgency, "low"));
    assert!(!predicate.matches(&listing));
}

#[test]
fn test_category_filter_is_exact_string() {
    let listing = listing_at(0.0, 0.0);

    let exact = FilterQuery {
        category: Some("Repair".to_string()),
        ..Default::default()
    };
    let lowercase = FilterQuery {
        category: Some("repair".to_string()),
        ..Default::default()
    };

    assert!(exact.compile().matches(&listing));
    assert!(!lowercase.compile().matches(&listing));
}
