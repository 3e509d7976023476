//! Centralized constants for the geopin crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Sphere radius used by Web Mercator (EPSG:3857), in meters
    pub const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

    /// Highest latitude representable in Web Mercator
    pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

    /// Half the projected world width in meters
    pub const HALF_WORLD_METERS: f64 = std::f64::consts::PI * WEB_MERCATOR_RADIUS;

    /// Tile size in pixels used to derive the resolution of a zoom level
    pub const TILE_SIZE_PX: f64 = 256.0;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";
}

/// Marker icon appearance
pub mod icon {
    /// Pin icon shared by both marker kinds
    pub const PIN_ICON_SRC: &str = "https://cdn-icons-png.flaticon.com/512/684/684908.png";

    /// Icon scale factor
    pub const PIN_ICON_SCALE: f64 = 0.05;

    /// Tint applied to the selected marker
    pub const SELECTED_TINT: &str = "blue";
}

/// User-facing texts
pub mod text {
    /// Shown when the geocoder answers without a usable name
    pub const NO_LOCATION_DATA: &str = "no location data";

    /// Shown while a lookup is still in flight
    pub const ADDRESS_PENDING: &str = "Looking up address...";

    /// Shown when the lookup failed
    pub const ADDRESS_FAILED: &str = "Address unavailable";
}
