//! Provider types and traits

use std::future::Future;

use thiserror::Error;

use crate::coord::Coordinates;
use crate::shop::Shop;

/// Errors that can occur during search backend operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Response body could not be parsed.
    #[error("Failed to parse response: {0}")]
    JsonError(String),

    /// The backend base URL is malformed.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

/// The opaque nearby-search capability.
///
/// The remote service's ranking and persistence are external collaborators;
/// implementations only translate between this contract and the transport.
pub trait SearchProvider: Send + Sync + 'static {
    /// Finds shops near `center`, optionally filtered by a free-text query.
    ///
    /// An empty `query` means no text filter. Result order is the backend's
    /// ranking and must be preserved.
    fn find_nearby(
        &self,
        center: Coordinates,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Shop>, ProviderError>> + Send;

    /// One-time demo-data side channel.
    ///
    /// Asks the backend to seed demo shops around `center` so a first load
    /// against an empty dataset is not blank. The response body is ignored
    /// beyond HTTP success.
    fn seed_demo(
        &self,
        center: Coordinates,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;
}
