//! Best-effort geolocation capability.
//!
//! The [`GeoLocator`] trait abstracts over position sources. Acquisition is
//! asynchronous and may fail; failure carries no detail the orchestrator
//! acts on, since the session always falls back to the default center.
//!
//! Two production implementations:
//!
//! - [`IpGeoLocator`] - coarse position from an IP-geolocation JSON endpoint
//! - [`FixedGeoLocator`] - a caller-supplied position (CLI `--lat`/`--lng`)

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::coord::Coordinates;

/// Default endpoint for IP-based geolocation.
pub const DEFAULT_GEOLOCATE_URL: &str = "http://ip-api.com/json";

/// Default HTTP timeout for the geolocation request.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur while acquiring a position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeolocateError {
    /// The capability is unavailable or the request failed.
    #[error("Geolocation unavailable: {0}")]
    Unavailable(String),

    /// The endpoint answered but did not produce a usable position.
    #[error("Geolocation failed: {0}")]
    Failed(String),
}

/// Trait for acquiring the device's current position.
///
/// Treated as best-effort by the orchestrator: a failure falls back to the
/// default center and is never surfaced as a user-visible error.
pub trait GeoLocator: Send + Sync + 'static {
    /// Attempts to acquire the current position.
    fn locate(&self) -> impl Future<Output = Result<Coordinates, GeolocateError>> + Send;
}

/// Response shape of the ip-api.com JSON endpoint.
///
/// Only the fields needed for a position; everything else is ignored.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
}

/// IP-based geolocation over HTTP.
///
/// Coarse (city-level) but requires no user interaction, which is all the
/// discovery session needs for an initial viewport.
pub struct IpGeoLocator {
    http: reqwest::Client,
    endpoint: String,
}

impl IpGeoLocator {
    /// Creates a locator against the default endpoint.
    pub fn new() -> Result<Self, GeolocateError> {
        Self::with_endpoint(DEFAULT_GEOLOCATE_URL)
    }

    /// Creates a locator against a custom endpoint (testing, self-hosting).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, GeolocateError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| GeolocateError::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

impl GeoLocator for IpGeoLocator {
    async fn locate(&self) -> Result<Coordinates, GeolocateError> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| GeolocateError::Unavailable(e.to_string()))?;

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| GeolocateError::Failed(e.to_string()))?;

        if body.status != "success" {
            return Err(GeolocateError::Failed(format!(
                "endpoint status '{}'",
                body.status
            )));
        }

        let coords = Coordinates::new(body.lat, body.lon)
            .map_err(|e| GeolocateError::Failed(e.to_string()))?;

        debug!(position = %coords, "IP geolocation acquired");
        Ok(coords)
    }
}

/// Geolocator that always yields a fixed position.
pub struct FixedGeoLocator {
    position: Coordinates,
}

impl FixedGeoLocator {
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

impl GeoLocator for FixedGeoLocator {
    async fn locate(&self) -> Result<Coordinates, GeolocateError> {
        Ok(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_locator_yields_position() {
        let coords = Coordinates::new(43.6, 1.4).unwrap();
        let locator = FixedGeoLocator::new(coords);

        assert_eq!(locator.locate().await.unwrap(), coords);
    }

    #[test]
    fn test_ip_api_response_deserialize() {
        let json = r#"{
            "status": "success",
            "country": "United States",
            "city": "San Francisco",
            "lat": 37.7749,
            "lon": -122.4194,
            "query": "203.0.113.7"
        }"#;

        let response: IpApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "success");
        assert!((response.lat - 37.7749).abs() < 1e-9);
        assert!((response.lon - (-122.4194)).abs() < 1e-9);
    }

    #[test]
    fn test_ip_api_response_failure_status() {
        let json = r#"{"status": "fail", "message": "private range"}"#;
        let response: IpApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "fail");
    }

    #[test]
    fn test_locator_creation() {
        assert!(IpGeoLocator::new().is_ok());
        assert!(IpGeoLocator::with_endpoint("http://geo.test/json").is_ok());
    }
}
