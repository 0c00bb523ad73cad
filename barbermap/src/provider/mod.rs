//! Search backend abstraction
//!
//! This module provides the capability seams between the orchestrator and
//! the remote search service:
//!
//! - [`AsyncHttpClient`] - transport seam, mockable in tests
//! - [`SearchProvider`] - the opaque `find_nearby` / `seed_demo` capability
//! - [`HttpSearchProvider`] - production implementation over the HTTP API
//!
//! The search service itself (ranking, persistence, geocoding) is an
//! external collaborator; only its request/response contract lives here.

mod http;
mod search;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use search::HttpSearchProvider;
pub use types::{ProviderError, SearchProvider};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
