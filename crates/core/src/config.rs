use crate::error::ConfigError;
use crate::map::MapView;
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_SEARCH_RADIUS_METERS: u32 = 150;
pub const DEFAULT_MAX_PLACE_RESULTS: usize = 20;
pub const DEFAULT_MAX_ARTICLES: usize = 1;
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_RESOLVED_ZOOM: u8 = 15;

pub const GOOGLE_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const GOOGLE_TEXT_SEARCH_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/place/textsearch/json";
pub const WIKIPEDIA_API_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
pub const WIKIPEDIA_ARTICLE_BASE: &str = "https://en.wikipedia.org/wiki/";

/// How an article query is made safe for the query string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryEncoding {
    /// Delete `&` from the query before sending it ("AT&T Park" becomes "ATT Park").
    #[default]
    StripSeparators,
    /// Keep the text intact and let URL encoding escape it.
    PercentEncode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub search_radius_meters: u32,
    pub max_place_results: usize,
    pub max_articles: usize,
    pub lookup_timeout_ms: u64,
    pub article_query_encoding: QueryEncoding,
    pub initial_view: MapView,
    pub resolved_zoom: u8,
    pub geocode_endpoint: String,
    pub place_search_endpoint: String,
    pub article_endpoint: String,
    pub article_base_url: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            search_radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            max_place_results: DEFAULT_MAX_PLACE_RESULTS,
            max_articles: DEFAULT_MAX_ARTICLES,
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            article_query_encoding: QueryEncoding::default(),
            initial_view: MapView {
                center: Coordinates::new(-28.0, 137.883),
                zoom: 4,
            },
            resolved_zoom: DEFAULT_RESOLVED_ZOOM,
            geocode_endpoint: GOOGLE_GEOCODE_ENDPOINT.to_string(),
            place_search_endpoint: GOOGLE_TEXT_SEARCH_ENDPOINT.to_string(),
            article_endpoint: WIKIPEDIA_API_ENDPOINT.to_string(),
            article_base_url: WIKIPEDIA_ARTICLE_BASE.to_string(),
        }
    }
}

impl MapConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_place_results == 0 {
            return Err(invalid("max_place_results", "must be at least 1"));
        }
        if self.max_articles == 0 {
            return Err(invalid("max_articles", "must be at least 1"));
        }
        if self.lookup_timeout_ms == 0 {
            return Err(invalid("lookup_timeout_ms", "must be positive"));
        }
        if self.search_radius_meters == 0 {
            return Err(invalid("search_radius_meters", "must be positive"));
        }

        for (field, value) in [
            ("geocode_endpoint", &self.geocode_endpoint),
            ("place_search_endpoint", &self.place_search_endpoint),
            ("article_endpoint", &self.article_endpoint),
            ("article_base_url", &self.article_base_url),
        ] {
            Url::parse(value).map_err(|error| invalid(field, &error.to_string()))?;
        }

        Ok(())
    }
}

fn invalid(field: &'static str, details: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        details: details.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_behavior() {
        let config = MapConfig::default();
        assert_eq!(config.search_radius_meters, 150);
        assert_eq!(config.max_place_results, 20);
        assert_eq!(config.max_articles, 1);
        assert_eq!(config.lookup_timeout(), Duration::from_millis(5_000));
        assert_eq!(config.article_query_encoding, QueryEncoding::StripSeparators);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_result_cap_is_rejected() {
        let config = MapConfig {
            max_place_results: 0,
            ..MapConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "max_place_results", .. })
        ));
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        let config = MapConfig {
            article_endpoint: "not a url".to_string(),
            ..MapConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "article_endpoint", .. })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: MapConfig =
            serde_json::from_str(r#"{"max_place_results": 5, "article_query_encoding": "percent_encode"}"#)
                .expect("config should parse");
        assert_eq!(config.max_place_results, 5);
        assert_eq!(config.article_query_encoding, QueryEncoding::PercentEncode);
        assert_eq!(config.search_radius_meters, 150);
    }
}
