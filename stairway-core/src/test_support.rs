//! Fixture catalog shared by unit, behaviour, and benchmark code.
//!
//! Seven destinations across four countries with scores for five features
//! grouped into three profiles:
//!
//! | id | name      | country     | culture weight |
//! |----|-----------|-------------|----------------|
//! | 1  | Amsterdam | Netherlands | 1.35           |
//! | 2  | Utrecht   | Netherlands | 1.2            |
//! | 3  | Bruges    | Belgium     | 1.5            |
//! | 4  | Chamonix  | France      | 0.15           |
//! | 5  | Nice      | France      | 0.6            |
//! | 6  | Texel     | Netherlands | 0.05           |
//! | 7  | Florence  | Italy       | 1.5            |

use crate::{Catalog, Destination, FeatureProfileMap, FeatureTable, normalise};

/// Feature columns of [`sample_catalog`], in declaration order.
pub const SAMPLE_FEATURES: [&str; 5] = ["hiking", "beach", "museums", "castles", "nightlife"];

struct Row {
    id: u64,
    name: &'static str,
    country: &'static str,
    lat: f64,
    lng: f64,
    nr_tokens: u32,
    scores: [f64; 5],
}

const ROWS: [Row; 7] = [
    Row {
        id: 1,
        name: "Amsterdam",
        country: "Netherlands",
        lat: 52.37,
        lng: 4.90,
        nr_tokens: 900,
        scores: [0.2, 0.3, 0.95, 0.4, 0.8],
    },
    Row {
        id: 2,
        name: "Utrecht",
        country: "Netherlands",
        lat: 52.09,
        lng: 5.12,
        nr_tokens: 300,
        scores: [0.3, 0.0, 0.7, 0.5, 0.4],
    },
    Row {
        id: 3,
        name: "Bruges",
        country: "Belgium",
        lat: 51.21,
        lng: 3.22,
        nr_tokens: 500,
        scores: [0.1, 0.0, 0.8, 0.7, 0.2],
    },
    Row {
        id: 4,
        name: "Chamonix",
        country: "France",
        lat: 45.92,
        lng: 6.87,
        nr_tokens: 400,
        scores: [0.95, 0.0, 0.1, 0.05, 0.3],
    },
    Row {
        id: 5,
        name: "Nice",
        country: "France",
        lat: 43.70,
        lng: 7.27,
        nr_tokens: 700,
        scores: [0.3, 0.9, 0.5, 0.1, 0.7],
    },
    Row {
        id: 6,
        name: "Texel",
        country: "Netherlands",
        lat: 53.05,
        lng: 4.80,
        nr_tokens: 100,
        scores: [0.8, 0.9, 0.05, 0.0, 0.1],
    },
    Row {
        id: 7,
        name: "Florence",
        country: "Italy",
        lat: 43.77,
        lng: 11.25,
        nr_tokens: 1000,
        scores: [0.2, 0.0, 0.9, 0.6, 0.5],
    },
];

/// Profile membership of [`SAMPLE_FEATURES`].
#[must_use]
pub fn sample_profiles() -> FeatureProfileMap {
    FeatureProfileMap::new()
        .with_membership("hiking", "nature")
        .with_membership("beach", "nature")
        .with_membership("museums", "culture")
        .with_membership("castles", "culture")
        .with_membership("nightlife", "party")
}

/// Build the fixture catalog described in the module docs.
///
/// `nr_tokens_norm` is normalised over the whole fixture and `weight` is
/// derived from `nr_tokens`.
///
/// # Panics
/// Never in practice; the fixture rows are statically valid.
#[must_use]
#[expect(clippy::expect_used, reason = "fixture rows are statically valid")]
pub fn sample_catalog() -> Catalog {
    let tokens: Vec<f64> = ROWS.iter().map(|row| f64::from(row.nr_tokens)).collect();
    let norms = normalise(&tokens).expect("fixture token counts have spread");
    let mut features = FeatureTable::new(SAMPLE_FEATURES.iter().map(|f| (*f).to_owned()).collect())
        .expect("fixture features are unique");
    let mut destinations = Vec::with_capacity(ROWS.len());
    for (row, norm) in ROWS.iter().zip(norms) {
        let destination = Destination::new(row.id, row.name, row.lat, row.lng)
            .expect("fixture coordinates are valid")
            .with_country(row.country)
            .with_status("published")
            .with_kind("city")
            .with_wiki_id(row.id + 1000)
            .with_nr_tokens(u64::from(row.nr_tokens))
            .with_nr_tokens_norm(norm);
        destinations.push(destination);
        features
            .insert_row(row.id, row.scores.to_vec())
            .expect("fixture rows match the feature columns");
    }
    Catalog::new(destinations, features, sample_profiles()).expect("fixture catalog is valid")
}
