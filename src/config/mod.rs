//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/geopin/config.toml

pub mod defaults;

use crate::coord::LonLat;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Reverse geocoding settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Map view settings
    #[serde(default)]
    pub map: MapConfig,

    /// Geolocation settings
    #[serde(default)]
    pub location: LocationConfig,
}

/// Reverse geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible service
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// User-Agent header (Nominatim rejects anonymous clients)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Text shown when the service has no name for a point
    #[serde(default = "default_fallback_text")]
    pub fallback_text: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Map view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial view center longitude
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,

    /// Initial view center latitude
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    /// Initial zoom, reused when centering on the user
    #[serde(default = "default_zoom")]
    pub zoom: f64,

    /// Viewport width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Viewport height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Marker hit radius in pixels
    #[serde(default = "default_hit_tolerance")]
    pub hit_tolerance_px: f64,
}

/// Geolocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Provider: "ip", "fixed" or "none"
    #[serde(default = "default_location_provider")]
    pub provider: String,

    /// Longitude for the fixed provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_lon: Option<f64>,

    /// Latitude for the fixed provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_lat: Option<f64>,

    /// Endpoint for the ip provider
    #[serde(default = "default_ip_api_url")]
    pub ip_api_url: String,

    /// Request timeout for the ip provider in seconds
    #[serde(default = "default_location_timeout")]
    pub timeout_secs: u64,
}

// Default value functions for serde
fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_fallback_text() -> String {
    DEFAULT_FALLBACK_TEXT.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_center_lon() -> f64 {
    DEFAULT_CENTER_LON
}
fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}
fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}
fn default_width() -> u32 {
    DEFAULT_WIDTH
}
fn default_height() -> u32 {
    DEFAULT_HEIGHT
}
fn default_hit_tolerance() -> f64 {
    DEFAULT_HIT_TOLERANCE_PX
}
fn default_location_provider() -> String {
    DEFAULT_LOCATION_PROVIDER.to_string()
}
fn default_ip_api_url() -> String {
    DEFAULT_IP_API_URL.to_string()
}
fn default_location_timeout() -> u64 {
    DEFAULT_LOCATION_TIMEOUT_SECS
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            fallback_text: default_fallback_text(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lon: default_center_lon(),
            center_lat: default_center_lat(),
            zoom: default_zoom(),
            width: default_width(),
            height: default_height(),
            hit_tolerance_px: default_hit_tolerance(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider: default_location_provider(),
            fixed_lon: None,
            fixed_lat: None,
            ip_api_url: default_ip_api_url(),
            timeout_secs: default_location_timeout(),
        }
    }
}

impl MapConfig {
    /// Initial view center
    pub fn center(&self) -> LonLat {
        LonLat::new(self.center_lon, self.center_lat)
    }
}

/// Parse a config value, mapping failures to a config error
fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

/// Parse a finite, non-negative number
fn parse_non_negative(key: &str, value: &str) -> Result<f64> {
    let parsed: f64 = parse_value(key, value)?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(Error::Config(format!(
            "Invalid value for {}: {} (expected a finite number >= 0)",
            key, value
        )));
    }
    Ok(parsed)
}

/// Parse a timeout; zero would fail every request
fn parse_timeout(key: &str, value: &str) -> Result<u64> {
    match parse_value(key, value)? {
        0 => Err(Error::Config(format!("Invalid value for {}: must be at least 1", key))),
        secs => Ok(secs),
    }
}

/// Parse a longitude or latitude and check it against the WGS84 range
fn parse_coordinate(key: &str, value: &str, place: impl Fn(f64) -> LonLat) -> Result<f64> {
    let parsed: f64 = parse_value(key, value)?;
    place(parsed)
        .validate()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", key, e)))?;
    Ok(parsed)
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "base_url"] => Some(self.geocoder.base_url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),
            ["geocoder", "fallback_text"] => Some(self.geocoder.fallback_text.clone()),
            ["geocoder", "timeout_secs"] => Some(self.geocoder.timeout_secs.to_string()),

            ["map", "center_lon"] => Some(self.map.center_lon.to_string()),
            ["map", "center_lat"] => Some(self.map.center_lat.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),
            ["map", "width"] => Some(self.map.width.to_string()),
            ["map", "height"] => Some(self.map.height.to_string()),
            ["map", "hit_tolerance_px"] => Some(self.map.hit_tolerance_px.to_string()),

            ["location", "provider"] => Some(self.location.provider.clone()),
            ["location", "fixed_lon"] => {
                Some(self.location.fixed_lon.map(|v| v.to_string()).unwrap_or_default())
            }
            ["location", "fixed_lat"] => {
                Some(self.location.fixed_lat.map(|v| v.to_string()).unwrap_or_default())
            }
            ["location", "ip_api_url"] => Some(self.location.ip_api_url.clone()),
            ["location", "timeout_secs"] => Some(self.location.timeout_secs.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "base_url"] => self.geocoder.base_url = value.to_string(),
            ["geocoder", "user_agent"] => self.geocoder.user_agent = value.to_string(),
            ["geocoder", "fallback_text"] => self.geocoder.fallback_text = value.to_string(),
            ["geocoder", "timeout_secs"] => self.geocoder.timeout_secs = parse_timeout(key, value)?,

            ["map", "center_lon"] => {
                self.map.center_lon = parse_coordinate(key, value, |lon| LonLat::new(lon, 0.0))?
            }
            ["map", "center_lat"] => {
                self.map.center_lat = parse_coordinate(key, value, |lat| LonLat::new(0.0, lat))?
            }
            ["map", "zoom"] => self.map.zoom = parse_non_negative(key, value)?,
            ["map", "width"] => self.map.width = parse_value(key, value)?,
            ["map", "height"] => self.map.height = parse_value(key, value)?,
            ["map", "hit_tolerance_px"] => self.map.hit_tolerance_px = parse_non_negative(key, value)?,

            ["location", "provider"] => match value {
                "ip" | "fixed" | "none" => self.location.provider = value.to_string(),
                _ => {
                    return Err(Error::Config(format!(
                        "Invalid location provider: {} (expected ip, fixed or none)",
                        value
                    )))
                }
            },
            ["location", "fixed_lon"] => {
                self.location.fixed_lon = Some(parse_coordinate(key, value, |lon| LonLat::new(lon, 0.0))?)
            }
            ["location", "fixed_lat"] => {
                self.location.fixed_lat = Some(parse_coordinate(key, value, |lat| LonLat::new(0.0, lat))?)
            }
            ["location", "ip_api_url"] => self.location.ip_api_url = value.to_string(),
            ["location", "timeout_secs"] => self.location.timeout_secs = parse_timeout(key, value)?,

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geocoder.base_url",
            "geocoder.user_agent",
            "geocoder.fallback_text",
            "geocoder.timeout_secs",
            "map.center_lon",
            "map.center_lat",
            "map.zoom",
            "map.width",
            "map.height",
            "map.hit_tolerance_px",
            "location.provider",
            "location.fixed_lon",
            "location.fixed_lat",
            "location.ip_api_url",
            "location.timeout_secs",
        ]
    }
}
