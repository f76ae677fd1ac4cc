///! Airport suggestion merging
use std::collections::HashSet;

use ctrl_tower_common::AirportSuggestion;

use super::schema::{RawSuggestion, SuggestionGroups};

/// Queries shorter than this never reach the network
pub const MIN_QUERY_LEN: usize = 2;

/// Trimmed query if it is long enough to search for
pub fn searchable_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    (trimmed.chars().count() >= MIN_QUERY_LEN).then_some(trimmed)
}

/// Concatenate the categories in priority order (direct matches, by city, by
/// country), drop entries without a code, and keep the first occurrence of
/// each code.
pub fn merge_suggestions(groups: SuggestionGroups) -> Vec<AirportSuggestion> {
    let mut seen = HashSet::new();

    groups
        .airports
        .into_iter()
        .chain(groups.airports_by_cities)
        .chain(groups.airports_by_countries)
        .filter_map(to_suggestion)
        .filter(|suggestion| seen.insert(suggestion.iata_code.clone()))
        .collect()
}

fn to_suggestion(raw: RawSuggestion) -> Option<AirportSuggestion> {
    let iata_code = raw.iata_code?.to_ascii_uppercase();
    Some(AirportSuggestion {
        name: raw.name.unwrap_or_else(|| iata_code.clone()),
        icao_code: raw.icao_code,
        city: raw.city,
        country_code: raw.country_code.unwrap_or_default(),
        iata_code,
    })
}
