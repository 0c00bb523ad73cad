//! Coordinate type definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// A geographic position as a latitude/longitude pair in decimal degrees.
///
/// Constructed through [`Coordinates::new`], which validates both axes.
/// The fields are public for pattern matching and serialization; code that
/// builds coordinates from untrusted input (config files, wire data) must go
/// through the validating constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees, positive north
    pub lat: f64,
    /// Longitude in decimal degrees, positive east
    pub lng: f64,
}

impl Coordinates {
    /// Creates validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError`] if either axis is outside its valid range
    /// or is not a finite number.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(MIN_LNG..=MAX_LNG).contains(&lng) {
            return Err(CoordError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { "N" } else { "S" };
        let ew = if self.lng >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}°{}, {:.4}°{}",
            self.lat.abs(),
            ns,
            self.lng.abs(),
            ew
        )
    }
}

/// Errors that can occur when constructing coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordError {
    /// Latitude is outside the valid range (-90.0 to 90.0)
    #[error("Invalid latitude: {0} (must be between {MIN_LAT} and {MAX_LAT})")]
    InvalidLatitude(f64),
    /// Longitude is outside the valid range (-180.0 to 180.0)
    #[error("Invalid longitude: {0} (must be between {MIN_LNG} and {MAX_LNG})")]
    InvalidLongitude(f64),
}
