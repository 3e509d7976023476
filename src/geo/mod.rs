//! Geocoding module
//!
//! Provides reverse geocoding (coordinates to address) and the geolocation
//! providers used to find the user's own position.

pub mod ip_location;
pub mod nominatim;

use crate::constants::text::{ADDRESS_FAILED, ADDRESS_PENDING};
use crate::coord::LonLat;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Lifecycle of an address lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressStatus {
    Pending,
    Resolved,
    Failed,
}

/// Result of a reverse geocoding lookup for one coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressInfo {
    /// The coordinate the lookup was issued for
    pub query: LonLat,
    /// Resolved address, or the fallback text when the service had no name
    pub text: String,
    pub status: AddressStatus,
}

impl AddressInfo {
    /// A lookup that has been issued but not answered yet
    pub fn pending(query: LonLat) -> Self {
        Self {
            query,
            text: String::new(),
            status: AddressStatus::Pending,
        }
    }

    /// A successful lookup
    pub fn resolved(query: LonLat, text: impl Into<String>) -> Self {
        Self {
            query,
            text: text.into(),
            status: AddressStatus::Resolved,
        }
    }

    /// A lookup that failed in transport
    pub fn failed(query: LonLat) -> Self {
        Self {
            query,
            text: String::new(),
            status: AddressStatus::Failed,
        }
    }

    /// Text to show in a popup for this address
    pub fn display_text(&self) -> &str {
        match self.status {
            AddressStatus::Pending => ADDRESS_PENDING,
            AddressStatus::Resolved => &self.text,
            AddressStatus::Failed => ADDRESS_FAILED,
        }
    }
}

/// Trait for reverse geocoding backends
pub trait ReverseGeocoder: Send + Sync {
    /// Resolve a coordinate to a human-readable address
    ///
    /// A response without a usable name resolves with fallback text.
    /// Transport failures, non-2xx responses and malformed bodies are errors.
    fn reverse_geocode(&self, at: LonLat) -> impl std::future::Future<Output = Result<AddressInfo>> + Send;
}

/// Trait for one-shot geolocation providers
pub trait Geolocator: Send + Sync {
    /// Find the user's current position
    fn locate(&self) -> impl std::future::Future<Output = Result<LonLat>> + Send;
}
