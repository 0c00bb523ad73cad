//! Marker layer built from a result set.
//!
//! A layer is constructed wholesale from the shops of one result set and
//! replaced in full on the next render. No incremental add/remove exists,
//! so a marker can never reference a shop from a stale result set.

use tracing::warn;

use crate::coord::Coordinates;
use crate::shop::Shop;

/// A single point marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Identity key of the shop (id, or name fallback).
    pub key: String,
    /// Label shown next to the marker.
    pub name: String,
    /// Marker position.
    pub position: Coordinates,
}

/// The full set of markers currently drawn on the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    /// An empty layer.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a layer with exactly one marker per shop, in result order.
    ///
    /// Shops with out-of-range positions are skipped with a warning rather
    /// than poisoning the whole layer.
    pub fn from_shops(shops: &[Shop]) -> Self {
        let mut markers = Vec::with_capacity(shops.len());
        for shop in shops {
            match shop.coordinates() {
                Ok(position) => markers.push(Marker {
                    key: shop.identity_key().to_string(),
                    name: shop.name.clone(),
                    position,
                }),
                Err(e) => {
                    warn!(shop = %shop.name, error = %e, "Skipping shop with invalid position");
                }
            }
        }
        Self { markers }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Positions of all markers, in layer order.
    pub fn positions(&self) -> Vec<Coordinates> {
        self.markers.iter().map(|m| m.position).collect()
    }
}
