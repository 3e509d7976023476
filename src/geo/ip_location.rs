//! Geolocation providers
//!
//! `IpLocator` asks ip-api.com where the machine is. `FixedLocator` returns a
//! configured point and `NoLocator` always fails, which the controller treats
//! like a denied permission prompt.

use crate::config::LocationConfig;
use crate::coord::LonLat;
use crate::error::{Error, Result};
use crate::geo::Geolocator;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// IP-based geolocation
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    url: String,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpLocator {
    /// Create an IP locator querying the given endpoint
    ///
    /// Requests that take longer than `timeout` fail as a geolocation error.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Parse an ip-api.com body into a coordinate
    fn parse(data: IpApiResponse) -> Result<LonLat> {
        if data.status != "success" {
            return Err(Error::Geolocation(format!(
                "IP location lookup failed: {}",
                data.message.unwrap_or_else(|| data.status.clone())
            )));
        }

        let lat = data.lat.ok_or_else(|| Error::Geolocation("No latitude in response".to_string()))?;
        let lon = data.lon.ok_or_else(|| Error::Geolocation("No longitude in response".to_string()))?;

        let coords = LonLat::new(lon, lat);
        coords
            .validate()
            .map_err(|e| Error::Geolocation(e.to_string()))?;
        Ok(coords)
    }
}

impl Geolocator for IpLocator {
    async fn locate(&self) -> Result<LonLat> {
        debug!(url = %self.url, "locating by IP");

        let response = self.client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Geolocation(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geolocation(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Geolocation(format!("Failed to parse IP location response: {}", e)))?;

        Self::parse(data)
    }
}

/// A geolocator that always answers with the same point
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub LonLat);

impl Geolocator for FixedLocator {
    async fn locate(&self) -> Result<LonLat> {
        self.0.validate().map_err(|e| Error::Geolocation(e.to_string()))?;
        Ok(self.0)
    }
}

/// A geolocator for environments without any position source
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocator;

impl Geolocator for NoLocator {
    async fn locate(&self) -> Result<LonLat> {
        Err(Error::Geolocation("No geolocation provider configured".to_string()))
    }
}

/// The provider selected by the `[location]` config section
#[derive(Debug, Clone)]
pub enum ConfiguredLocator {
    Ip(IpLocator),
    Fixed(FixedLocator),
    None(NoLocator),
}

impl ConfiguredLocator {
    /// Build the provider named by `location.provider`
    pub fn from_config(config: &LocationConfig) -> Result<Self> {
        match config.provider.as_str() {
            "ip" => Ok(Self::Ip(IpLocator::new(
                &config.ip_api_url,
                Duration::from_secs(config.timeout_secs),
            )?)),
            "fixed" => match (config.fixed_lon, config.fixed_lat) {
                (Some(lon), Some(lat)) => Ok(Self::Fixed(FixedLocator(LonLat::new(lon, lat)))),
                _ => Err(Error::Config(
                    "location.provider = \"fixed\" requires location.fixed_lon and location.fixed_lat"
                        .to_string(),
                )),
            },
            "none" => Ok(Self::None(NoLocator)),
            other => Err(Error::Config(format!("Unknown location provider: {}", other))),
        }
    }
}

impl Geolocator for ConfiguredLocator {
    async fn locate(&self) -> Result<LonLat> {
        match self {
            Self::Ip(locator) => locator.locate().await,
            Self::Fixed(locator) => locator.locate().await,
            Self::None(locator) => locator.locate().await,
        }
    }
}
