//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::api::{IP_API_URL, NOMINATIM_URL};
use crate::constants::text::NO_LOCATION_DATA;

/// Default reverse geocoding endpoint
pub const DEFAULT_GEOCODER_URL: &str = NOMINATIM_URL;

/// Default User-Agent sent to the geocoder
pub const DEFAULT_USER_AGENT: &str = concat!("geopin/", env!("CARGO_PKG_VERSION"));

/// Default text when the geocoder has no name for a point
pub const DEFAULT_FALLBACK_TEXT: &str = NO_LOCATION_DATA;

/// Default HTTP timeout for geocoding requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default view center longitude (Bandung)
pub const DEFAULT_CENTER_LON: f64 = 107.57634352477324;

/// Default view center latitude (Bandung)
pub const DEFAULT_CENTER_LAT: f64 = -6.87436891415509;

/// Default zoom level, also applied once the user is located
pub const DEFAULT_ZOOM: f64 = 16.0;

/// Default viewport width in pixels
pub const DEFAULT_WIDTH: u32 = 1024;

/// Default viewport height in pixels
pub const DEFAULT_HEIGHT: u32 = 768;

/// Default marker hit radius in pixels
pub const DEFAULT_HIT_TOLERANCE_PX: f64 = 12.0;

/// Default geolocation provider
pub const DEFAULT_LOCATION_PROVIDER: &str = "ip";

/// Default HTTP timeout for IP geolocation in seconds
pub const DEFAULT_LOCATION_TIMEOUT_SECS: u64 = 10;

/// Default IP geolocation endpoint
pub const DEFAULT_IP_API_URL: &str = IP_API_URL;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "geopin";
