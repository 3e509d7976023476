//! Spherical Web Mercator (EPSG:3857) projection
//!
//! Both directions are pure and total. Latitudes beyond the Mercator limit
//! are clamped; longitudes are wrapped into [-180, 180).

use crate::constants::geo::{MAX_MERCATOR_LATITUDE, WEB_MERCATOR_RADIUS};
use crate::coord::{LonLat, Projected};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Convert geographic coordinates to projected map coordinates
pub fn to_projected(coords: LonLat) -> Projected {
    let lat = coords.lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let x = WEB_MERCATOR_RADIUS * coords.lon.to_radians();
    let y = WEB_MERCATOR_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Projected::new(x, y)
}

/// Convert projected map coordinates to geographic coordinates
pub fn to_geographic(point: Projected) -> LonLat {
    let lon = wrap_longitude((point.x / WEB_MERCATOR_RADIUS).to_degrees());
    let lat = (2.0 * (point.y / WEB_MERCATOR_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
    LonLat::new(lon, lat)
}

/// Wrap a longitude into [-180, 180)
fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
