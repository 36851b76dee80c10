use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::{City, Country, Marker};

/// derive_countries
///
/// Projects the visited cities down to their unique countries, in first-seen
/// order. Called from the views that display countries on every render; the
/// result is never stored.
pub fn derive_countries(cities: &[City]) -> Vec<Country> {
    let mut seen = HashSet::new();

    cities
        .iter()
        .filter(|city| seen.insert(city.country.as_str()))
        .map(|city| Country {
            country: city.country.clone(),
            emoji: city.emoji.clone(),
        })
        .collect()
}

/// map_markers
///
/// The records handed to the client-side map.
pub fn map_markers(cities: &[City]) -> Vec<Marker> {
    cities
        .iter()
        .map(|city| Marker {
            city_name: city.city_name.clone(),
            emoji: city.emoji.clone(),
            lat: city.position.lat,
            lng: city.position.lng,
        })
        .collect()
}

/// Long date used on the city detail page, e.g. "Sunday, October 31, 2027".
pub fn format_date_long(date: &DateTime<Utc>) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Short date used in the city list, e.g. "(October 31, 2027)".
pub fn format_date_short(date: &DateTime<Utc>) -> String {
    date.format("(%B %-d, %Y)").to_string()
}
