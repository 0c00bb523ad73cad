//! Geographic coordinate module
//!
//! Provides the validated latitude/longitude pair used for the viewport
//! center, shop positions, and geolocation results.

mod types;

pub use types::{CoordError, Coordinates, MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG};

/// Default viewport center used until geolocation succeeds.
///
/// San Francisco city center. Chosen so the client always has a reasonable
/// view even when the geolocation capability is unavailable or denied.
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 37.7749,
    lng: -122.4194,
};
