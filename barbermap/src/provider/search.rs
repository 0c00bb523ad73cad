//! HTTP implementation of the nearby-search capability.
//!
//! Talks to the backend API:
//!
//! - `GET  {base}/api/barbershops?lat=<f64>&lng=<f64>[&q=<str>]`
//! - `POST {base}/api/barbershops/seed` with body `{"lat": f64, "lng": f64}`
//!
//! An absent `items` field in the search response is treated as an empty
//! result set, not an error.

use reqwest::Url;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::{ProviderError, SearchProvider};
use crate::coord::Coordinates;
use crate::shop::{warn_missing_ids, SearchResponse, Shop};

/// Path of the nearby-search endpoint.
const SEARCH_PATH: &str = "/api/barbershops";

/// Path of the demo-data seed endpoint.
const SEED_PATH: &str = "/api/barbershops/seed";

/// Search provider backed by the HTTP API.
///
/// Generic over the HTTP client so tests can inject a mock transport.
#[derive(Clone)]
pub struct HttpSearchProvider<C> {
    http: C,
    base_url: String,
}

impl<C: AsyncHttpClient> HttpSearchProvider<C> {
    /// Creates a provider against the given backend base URL.
    ///
    /// A trailing slash on `base_url` is tolerated.
    pub fn new(http: C, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    /// Builds the search URL for a center and query.
    ///
    /// The `q` parameter is omitted entirely for an empty query, matching
    /// the backend's "no text filter" contract.
    fn search_url(&self, center: Coordinates, query: &str) -> Result<Url, ProviderError> {
        let endpoint = format!("{}{}", self.base_url, SEARCH_PATH);
        let lat = center.lat.to_string();
        let lng = center.lng.to_string();

        let mut params: Vec<(&str, &str)> = vec![("lat", &lat), ("lng", &lng)];
        if !query.is_empty() {
            params.push(("q", query));
        }

        Url::parse_with_params(&endpoint, &params)
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", endpoint, e)))
    }
}

impl<C: AsyncHttpClient + 'static> SearchProvider for HttpSearchProvider<C> {
    async fn find_nearby(
        &self,
        center: Coordinates,
        query: &str,
    ) -> Result<Vec<Shop>, ProviderError> {
        let url = self.search_url(center, query)?;
        let body = self.http.get(url.as_str()).await?;

        let response: SearchResponse = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::JsonError(e.to_string()))?;

        debug!(
            center = %center,
            query = query,
            items = response.items.len(),
            "Nearby search completed"
        );

        warn_missing_ids(&response.items);
        Ok(response.items)
    }

    async fn seed_demo(&self, center: Coordinates) -> Result<(), ProviderError> {
        let url = format!("{}{}", self.base_url, SEED_PATH);
        let body =
            serde_json::to_string(&center).map_err(|e| ProviderError::JsonError(e.to_string()))?;

        // Response body is ignored beyond HTTP success
        self.http.post_json(&url, &body).await?;

        debug!(center = %center, "Demo seed requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::http::tests::MockAsyncHttpClient;
    use super::*;
    use crate::coord::DEFAULT_CENTER;

    fn provider_with(response: &str) -> HttpSearchProvider<MockAsyncHttpClient> {
        let mock = MockAsyncHttpClient::with_response(Ok(response.as_bytes().to_vec()));
        HttpSearchProvider::new(mock, "http://backend.test")
    }

    #[tokio::test]
    async fn test_find_nearby_parses_items() {
        let provider = provider_with(
            r#"{"items": [
                {"id": "1", "name": "Fade Factory", "lat": 37.78, "lng": -122.41, "address": "a", "rating": 4.7},
                {"id": "2", "name": "Clip Joint", "lat": 37.77, "lng": -122.42, "address": "b", "rating": 4.1}
            ]}"#,
        );

        let shops = provider.find_nearby(DEFAULT_CENTER, "fade").await.unwrap();
        assert_eq!(shops.len(), 2);
        // Backend order preserved, never re-sorted
        assert_eq!(shops[0].name, "Fade Factory");
        assert_eq!(shops[1].name, "Clip Joint");
    }

    #[tokio::test]
    async fn test_find_nearby_missing_items_is_empty() {
        let provider = provider_with("{}");

        let shops = provider.find_nearby(DEFAULT_CENTER, "").await.unwrap();
        assert!(shops.is_empty());
    }

    #[tokio::test]
    async fn test_find_nearby_invalid_json_is_error() {
        let provider = provider_with("not json");

        let result = provider.find_nearby(DEFAULT_CENTER, "").await;
        assert!(matches!(result, Err(ProviderError::JsonError(_))));
    }

    #[tokio::test]
    async fn test_search_url_includes_query_when_present() {
        let provider = provider_with("{}");
        provider
            .find_nearby(DEFAULT_CENTER, "fade cut")
            .await
            .unwrap();

        let urls = provider.http.requested_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].starts_with("http://backend.test/api/barbershops?"));
        assert!(urls[0].contains("lat=37.7749"));
        assert!(urls[0].contains("lng=-122.4194"));
        assert!(urls[0].contains("q=fade+cut"));
    }

    #[tokio::test]
    async fn test_search_url_omits_empty_query() {
        let provider = provider_with("{}");
        provider.find_nearby(DEFAULT_CENTER, "").await.unwrap();

        let urls = provider.http.requested_urls();
        assert!(!urls[0].contains("q="));
    }

    #[tokio::test]
    async fn test_trailing_slash_tolerated() {
        let mock = MockAsyncHttpClient::with_response(Ok(b"{}".to_vec()));
        let provider = HttpSearchProvider::new(mock, "http://backend.test/");
        provider.find_nearby(DEFAULT_CENTER, "").await.unwrap();

        let urls = provider.http.requested_urls();
        assert!(urls[0].starts_with("http://backend.test/api/barbershops?"));
    }

    #[tokio::test]
    async fn test_seed_posts_center_as_json() {
        let provider = provider_with("{}");
        provider.seed_demo(DEFAULT_CENTER).await.unwrap();

        let urls = provider.http.requested_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].starts_with("POST http://backend.test/api/barbershops/seed "));
        assert!(urls[0].contains("\"lat\":37.7749"));
        assert!(urls[0].contains("\"lng\":-122.4194"));
    }

    #[tokio::test]
    async fn test_seed_propagates_transport_failure() {
        let mock = MockAsyncHttpClient::with_response(Err(ProviderError::HttpError(
            "connection refused".to_string(),
        )));
        let provider = HttpSearchProvider::new(mock, "http://backend.test");

        let result = provider.seed_demo(DEFAULT_CENTER).await;
        assert!(matches!(result, Err(ProviderError::HttpError(_))));
    }
}
