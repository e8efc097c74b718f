use crate::models::PlaceId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("address is empty")]
    EmptyAddress,

    #[error("no location matches \"{address}\"")]
    ZeroResults { address: String },

    #[error("geocoding quota exhausted ({status})")]
    Quota { status: String },

    #[error("geocoder returned {status}")]
    Status { status: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid response from geocoder: {0}")]
    InvalidResponse(String),
}

impl GeocodeError {
    /// Short provider-facing reason, shown to the user next to the failure.
    pub fn reason(&self) -> String {
        match self {
            Self::EmptyAddress => "EMPTY_ADDRESS".to_string(),
            Self::ZeroResults { .. } => "ZERO_RESULTS".to_string(),
            Self::Quota { status } | Self::Status { status } => status.clone(),
            Self::Http(_) | Self::Url(_) => "NETWORK_ERROR".to_string(),
            Self::InvalidResponse(_) => "INVALID_RESPONSE".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no resolved address to search around")]
    NotResolved,

    #[error("refine query is empty")]
    EmptyQuery,

    #[error("place search returned {status}")]
    Status { status: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid response from place search: {0}")]
    InvalidResponse(String),
}

impl SearchError {
    pub fn status(&self) -> String {
        match self {
            Self::NotResolved => "NOT_RESOLVED".to_string(),
            Self::EmptyQuery => "EMPTY_QUERY".to_string(),
            Self::Status { status } => status.clone(),
            Self::Http(_) | Self::Url(_) => "NETWORK_ERROR".to_string(),
            Self::InvalidResponse(_) => "INVALID_RESPONSE".to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no articles match \"{query}\"")]
    NoMatch { query: String },

    #[error("article lookup timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("article transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("no place with id {0} in the current result list")]
    UnknownPlace(PlaceId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {field}: {details}")]
    InvalidValue { field: &'static str, details: String },
}
