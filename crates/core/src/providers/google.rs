use crate::config::{MapConfig, GOOGLE_GEOCODE_ENDPOINT, GOOGLE_TEXT_SEARCH_ENDPOINT};
use crate::traits::PlaceProvider;
use crate::{Coordinates, GeocodeError, RawPlace, SearchError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Geocoding and Places text search backed by the Google Maps web services.
pub struct GoogleMapsProvider {
    client: Client,
    api_key: String,
    geocode_endpoint: String,
    search_endpoint: String,
}

impl GoogleMapsProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            geocode_endpoint: GOOGLE_GEOCODE_ENDPOINT.to_string(),
            search_endpoint: GOOGLE_TEXT_SEARCH_ENDPOINT.to_string(),
        }
    }

    pub fn from_config(api_key: impl Into<String>, config: &MapConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            geocode_endpoint: config.geocode_endpoint.clone(),
            search_endpoint: config.place_search_endpoint.clone(),
        }
    }

    fn geocode_url(&self, address: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.geocode_endpoint)?;
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    fn search_url(
        &self,
        center: Coordinates,
        radius_meters: u32,
        query: &str,
    ) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.search_endpoint)?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("location", &center.to_string())
            .append_pair("radius", &radius_meters.to_string())
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl PlaceProvider for GoogleMapsProvider {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let url = self.geocode_url(address)?;
        debug!(address = %address, "geocode request");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status {
                status: format!("HTTP {}", response.status()),
            });
        }

        let body: Value = response.json().await?;
        parse_geocode_response(address, &body)
    }

    async fn search(
        &self,
        center: Coordinates,
        radius_meters: u32,
        query: &str,
    ) -> Result<Vec<RawPlace>, SearchError> {
        let url = self.search_url(center, radius_meters, query)?;
        debug!(query = %query, center = %center, radius_meters, "place search request");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(SearchError::Status {
                status: format!("HTTP {}", response.status()),
            });
        }

        let body: Value = response.json().await?;
        parse_text_search_response(&body)
    }
}

pub fn parse_geocode_response(address: &str, body: &Value) -> Result<Coordinates, GeocodeError> {
    let status = body
        .pointer("/status")
        .and_then(Value::as_str)
        .ok_or_else(|| GeocodeError::InvalidResponse("missing status".to_string()))?;

    match status {
        "OK" => {}
        "ZERO_RESULTS" => {
            return Err(GeocodeError::ZeroResults {
                address: address.to_string(),
            })
        }
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => {
            return Err(GeocodeError::Quota {
                status: status.to_string(),
            })
        }
        other => {
            return Err(GeocodeError::Status {
                status: other.to_string(),
            })
        }
    }

    body.pointer("/results/0/geometry/location")
        .and_then(location_from)
        .ok_or_else(|| GeocodeError::InvalidResponse("first result has no location".to_string()))
}

pub fn parse_text_search_response(body: &Value) -> Result<Vec<RawPlace>, SearchError> {
    let status = body
        .pointer("/status")
        .and_then(Value::as_str)
        .ok_or_else(|| SearchError::InvalidResponse("missing status".to_string()))?;

    match status {
        "OK" => {}
        "ZERO_RESULTS" => return Ok(Vec::new()),
        other => {
            return Err(SearchError::Status {
                status: other.to_string(),
            })
        }
    }

    let results = body
        .pointer("/results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut places = Vec::with_capacity(results.len());
    for raw in results {
        let name = raw.pointer("/name").and_then(Value::as_str);
        let location = raw.pointer("/geometry/location").and_then(location_from);

        match (name, location) {
            (Some(name), Some(coordinates)) => places.push(RawPlace {
                name: name.to_string(),
                coordinates,
                metadata: raw.clone(),
            }),
            _ => debug!("skipping place result without name or location"),
        }
    }

    Ok(places)
}

fn location_from(value: &Value) -> Option<Coordinates> {
    let lat = value.pointer("/lat").and_then(Value::as_f64)?;
    let lng = value.pointer("/lng").and_then(Value::as_f64)?;
    Some(Coordinates::new(lat, lng))
}
