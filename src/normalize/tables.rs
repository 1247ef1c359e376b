//! Static lookup tables used by the row normalizer.
//!
//! Both tables are plain literals; nothing is learned or mutated at runtime.

use once_cell::sync::Lazy;

use crate::types::{ProjectTypeCode, RegionCode};

/// Country and major-city names per region. Matched on word boundaries,
/// so "us" does not fire inside "Australia".
pub const REGION_TABLE: &[(RegionCode, &[&str])] = &[
    (
        RegionCode::NA,
        &[
            "us",
            "usa",
            "u s",
            "u s a",
            "united states",
            "united states of america",
            "america",
            "canada",
            "mexico",
            "los angeles",
            "new york",
            "atlanta",
            "chicago",
            "new orleans",
            "austin",
            "albuquerque",
            "toronto",
            "vancouver",
            "montreal",
        ],
    ),
    (
        RegionCode::EU,
        &[
            "uk",
            "united kingdom",
            "england",
            "scotland",
            "ireland",
            "germany",
            "france",
            "italy",
            "spain",
            "netherlands",
            "belgium",
            "sweden",
            "norway",
            "denmark",
            "poland",
            "czech republic",
            "hungary",
            "london",
            "paris",
            "berlin",
            "madrid",
            "rome",
            "prague",
            "budapest",
            "dublin",
        ],
    ),
    (
        RegionCode::AP,
        &[
            "india",
            "china",
            "japan",
            "korea",
            "south korea",
            "australia",
            "singapore",
            "hong kong",
            "new zealand",
            "thailand",
            "philippines",
            "indonesia",
            "mumbai",
            "tokyo",
            "seoul",
            "sydney",
            "melbourne",
            "auckland",
            "bangkok",
        ],
    ),
    (
        RegionCode::LA,
        &[
            "brazil",
            "argentina",
            "chile",
            "colombia",
            "peru",
            "venezuela",
            "mexico city",
            "sao paulo",
            "são paulo",
            "rio de janeiro",
            "buenos aires",
            "bogota",
            "bogotá",
            "santiago",
            "lima",
        ],
    ),
];

/// Region phrases split into words, longest first, so "mexico city" (LA)
/// wins over "mexico" (NA).
pub static REGION_PHRASES: Lazy<Vec<(Vec<&'static str>, RegionCode)>> = Lazy::new(|| {
    let mut phrases: Vec<(Vec<&'static str>, RegionCode)> = REGION_TABLE
        .iter()
        .flat_map(|(code, names)| {
            names
                .iter()
                .map(move |&name| (name.split_whitespace().collect(), *code))
        })
        .collect();
    // stable: ties keep table order
    phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    phrases
});

/// Project-type keywords in evaluation order. First match wins; V is the fallback.
/// Order matters under substring matching: "tv commercial" is T.
pub const PROJECT_TYPE_TABLE: &[(ProjectTypeCode, &[&str])] = &[
    (ProjectTypeCode::F, &["film", "movie", "feature"]),
    (
        ProjectTypeCode::T,
        &["tv", "television", "series", "streaming", "show", "episode"],
    ),
    (ProjectTypeCode::C, &["commercial", "advertisement", "ad"]),
];
