use crate::map::MarkerHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// A place as the provider returned it, before the controller gives it an id
/// and a marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawPlace {
    pub name: String,
    pub coordinates: Coordinates,
    pub metadata: Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceId(pub u64);

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the result list. The marker handle is owned here and given
/// back to the map when the place is dropped from the list.
#[derive(Debug)]
pub struct PlaceResult {
    pub id: PlaceId,
    pub name: String,
    pub coordinates: Coordinates,
    pub raw_metadata: Value,
    pub marker: Option<MarkerHandle>,
}

impl PlaceResult {
    pub fn matches_filter(&self, needle_lowercase: &str) -> bool {
        self.name.to_lowercase().contains(needle_lowercase)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchContext {
    pub address_text: String,
    pub resolved_coordinates: Option<Coordinates>,
    pub refine_query: String,
}

impl SearchContext {
    pub fn is_resolved(&self) -> bool {
        self.resolved_coordinates.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn place(name: &str) -> PlaceResult {
        PlaceResult {
            id: PlaceId(1),
            name: name.to_string(),
            coordinates: Coordinates::new(0.0, 0.0),
            raw_metadata: json!({}),
            marker: None,
        }
    }

    #[test]
    fn filter_match_ignores_case() {
        let result = place("Blue Bottle Coffee");
        assert!(result.matches_filter("bottle"));
        assert!(result.matches_filter("blue bottle c"));
        assert!(!result.matches_filter("tea"));
    }

    #[test]
    fn coordinates_display_as_lat_lng_pair() {
        let coordinates = Coordinates::new(37.7749, -122.4194);
        assert_eq!(coordinates.to_string(), "37.774900,-122.419400");
    }
}
