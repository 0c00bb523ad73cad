//! Shop data model and search state.
//!
//! Defines the wire-level [`Shop`] item returned by the backend, the
//! [`SearchState`] snapshot that drives both the map surface and the list
//! view, and the response envelope for the nearby-search endpoint.
//!
//! A result set is always replaced wholesale from a response — never merged
//! or re-sorted client-side — so views can treat it as an immutable snapshot.

use serde::Deserialize;
use tracing::warn;

use crate::coord::{CoordError, Coordinates, DEFAULT_CENTER};

/// A single shop as returned by the search backend.
///
/// The wire format carries flat `lat`/`lng` fields. Identity key is `id`;
/// an empty `id` is tolerated for rendering (callers fall back to `name`)
/// but flagged as a data-quality problem, since name collisions would make
/// list rows and markers ambiguous.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Shop {
    /// Stable identifier, unique within a result set.
    #[serde(default)]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Rating from 0.0 to 5.0.
    #[serde(default)]
    pub rating: f64,
}

impl Shop {
    /// Returns the shop's position as validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError`] if the backend sent an out-of-range position.
    pub fn coordinates(&self) -> Result<Coordinates, CoordError> {
        Coordinates::new(self.lat, self.lng)
    }

    /// Identity key for list rendering and marker labels.
    ///
    /// Falls back to `name` when `id` is empty. Callers must not rely on
    /// fallback uniqueness; see [`warn_missing_ids`].
    pub fn identity_key(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}

/// Response envelope for `GET /api/barbershops`.
///
/// An absent `items` field is an empty result set, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<Shop>,
}

/// Logs a data-quality warning for shops arriving without an `id`.
///
/// The fallback to `name` can silently collide, so surface it once per
/// response rather than degrading quietly.
pub fn warn_missing_ids(shops: &[Shop]) {
    let missing = shops.iter().filter(|s| s.id.is_empty()).count();
    if missing > 0 {
        warn!(
            missing,
            total = shops.len(),
            "Shops received without stable id; falling back to name as identity key"
        );
    }
}

/// Snapshot of the discovery session's state.
///
/// Exactly one `SearchState` is live per session; the orchestrator publishes
/// updated snapshots and both the map surface and the list view render from
/// the latest one.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Current viewport center.
    pub coordinates: Coordinates,
    /// Current free-text filter; empty means no filter.
    pub query: String,
    /// Latest successfully fetched result set, in backend order.
    pub results: Vec<Shop>,
    /// Whether a search is currently in flight.
    pub loading: bool,
}

impl SearchState {
    /// Initial state: given center, empty query, no results, not loading.
    pub fn initial(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            query: String::new(),
            results: Vec::new(),
            loading: false,
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::initial(DEFAULT_CENTER)
    }
}
