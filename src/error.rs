//! Error types for geopin

use thiserror::Error;

/// Main error type for geopin operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Geolocation error: {0}")]
    Geolocation(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Marker error: {0}")]
    Marker(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for geopin operations
pub type Result<T> = std::result::Result<T, Error>;
