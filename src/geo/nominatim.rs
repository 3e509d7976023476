//! Nominatim reverse geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for reverse geocoding.
//! Nominatim's usage policy expects at most one request per second and an
//! identifying User-Agent. The User-Agent is sent; the rate is up to the caller.

use crate::config::GeocoderConfig;
use crate::coord::LonLat;
use crate::error::{Error, Result};
use crate::geo::{AddressInfo, ReverseGeocoder};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Nominatim reverse geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    fallback_text: String,
}

/// Nominatim reverse response
///
/// Nominatim answers unresolvable points with `{"error": "..."}` and no name.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

impl NominatimGeocoder {
    /// Create a backend for the given endpoint
    pub fn new(
        base_url: &str,
        user_agent: &str,
        fallback_text: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            fallback_text: fallback_text.to_string(),
        })
    }

    /// Create a backend from the `[geocoder]` config section
    pub fn from_config(config: &GeocoderConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.user_agent,
            &config.fallback_text,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Build the reverse lookup URL for a coordinate
    fn reverse_url(&self, at: LonLat) -> String {
        format!(
            "{}/reverse?format=json&lon={}&lat={}",
            self.base_url, at.lon, at.lat
        )
    }

    /// Pick the display name, or the fallback when it is missing or blank
    fn resolve_name(&self, response: ReverseResponse) -> String {
        match response.display_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.fallback_text.clone(),
        }
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse_geocode(&self, at: LonLat) -> Result<AddressInfo> {
        let url = self.reverse_url(at);
        debug!(%url, "reverse geocoding");

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: ReverseResponse = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        Ok(AddressInfo::resolved(at, self.resolve_name(result)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::text::NO_LOCATION_DATA;
    use crate::geo::AddressStatus;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;

    /// Serve `router` on an ephemeral port and return its base URL
    async fn spawn_fake(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn geocoder(base_url: &str) -> NominatimGeocoder {
        NominatimGeocoder::new(base_url, "geopin-test", NO_LOCATION_DATA, Duration::from_secs(5))
            .unwrap()
    }

    async fn echo_handler(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        let body = serde_json::json!({
            "display_name": format!(
                "lon={} lat={} format={}",
                params.get("lon").cloned().unwrap_or_default(),
                params.get("lat").cloned().unwrap_or_default(),
                params.get("format").cloned().unwrap_or_default(),
            )
        });
        axum::Json(body)
    }

    #[test]
    fn test_reverse_url() {
        let backend = geocoder("https://example.org/");
        let url = backend.reverse_url(LonLat::new(107.5, -6.25));
        assert_eq!(url, "https://example.org/reverse?format=json&lon=107.5&lat=-6.25");
    }

    #[tokio::test]
    async fn test_resolves_display_name() {
        let base = spawn_fake(Router::new().route("/reverse", get(echo_handler))).await;
        let at = LonLat::new(107.5763, -6.8744);

        let info = geocoder(&base).reverse_geocode(at).await.unwrap();

        assert_eq!(info.status, AddressStatus::Resolved);
        assert_eq!(info.query, at);
        assert_eq!(info.text, "lon=107.5763 lat=-6.8744 format=json");
    }

    #[tokio::test]
    async fn test_missing_name_uses_fallback() {
        let router = Router::new().route(
            "/reverse",
            get(|| async { axum::Json(serde_json::json!({ "error": "Unable to geocode" })) }),
        );
        let base = spawn_fake(router).await;

        let info = geocoder(&base).reverse_geocode(LonLat::new(0.0, 0.0)).await.unwrap();

        assert_eq!(info.status, AddressStatus::Resolved);
        assert_eq!(info.text, NO_LOCATION_DATA);
    }

    #[tokio::test]
    async fn test_blank_name_uses_fallback() {
        let router = Router::new().route(
            "/reverse",
            get(|| async { axum::Json(serde_json::json!({ "display_name": "  " })) }),
        );
        let base = spawn_fake(router).await;

        let info = geocoder(&base).reverse_geocode(LonLat::new(0.0, 0.0)).await.unwrap();
        assert_eq!(info.text, NO_LOCATION_DATA);
    }

    #[tokio::test]
    async fn test_server_error_is_failure() {
        let router = Router::new().route(
            "/reverse",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_fake(router).await;

        let result = geocoder(&base).reverse_geocode(LonLat::new(106.0, -6.0)).await;
        assert!(matches!(result, Err(Error::Geocoding(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_failure() {
        let router = Router::new().route("/reverse", get(|| async { "not json" }));
        let base = spawn_fake(router).await;

        let result = geocoder(&base).reverse_geocode(LonLat::new(106.0, -6.0)).await;
        assert!(matches!(result, Err(Error::Geocoding(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = geocoder(&format!("http://{}", addr))
            .reverse_geocode(LonLat::new(106.0, -6.0))
            .await;
        assert!(matches!(result, Err(Error::Geocoding(_))));
    }
}
