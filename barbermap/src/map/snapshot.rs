//! Snapshot map widget rendering PNG images from OpenStreetMap tiles.
//!
//! The concrete [`MapWidget`] used by the CLI: each render fetches base-map
//! tiles for the current viewport and writes a PNG with one circle marker
//! per shop. The remote tile server doubles as the widget's runtime asset;
//! [`MapWidget::load_runtime`] probes it once per process and, if the probe
//! fails, parks forever so mounts stay pending (degraded mode, no retry).

use std::future::Future;
use std::path::PathBuf;

use staticmap::tools::{CircleBuilder, Color};
use staticmap::StaticMapBuilder;
use tracing::{debug, warn};

use super::marker::MarkerLayer;
use super::widget::{MapError, MapInstance, MapOptions, MapWidget};
use crate::coord::Coordinates;

/// OpenStreetMap tile URL template.
const DEFAULT_TILE_URL: &str = "https://a.tile.osm.org/{z}/{x}/{y}.png";

/// Tile fetched once to verify the tile server is reachable.
const DEFAULT_PROBE_URL: &str = "https://a.tile.osm.org/0/0/0.png";

/// Configuration for the snapshot widget.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Output image width in pixels.
    pub width: u32,
    /// Output image height in pixels.
    pub height: u32,
    /// Where the rendered PNG is written on each render.
    pub output_path: PathBuf,
    /// Tile server URL template.
    pub tile_url: String,
    /// URL probed once at runtime load.
    pub probe_url: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            output_path: PathBuf::from("barbermap.png"),
            tile_url: DEFAULT_TILE_URL.to_string(),
            probe_url: DEFAULT_PROBE_URL.to_string(),
        }
    }
}

/// Map widget that renders static PNG snapshots.
pub struct SnapshotMapWidget {
    config: SnapshotConfig,
}

impl SnapshotMapWidget {
    pub fn new(config: SnapshotConfig) -> Self {
        Self { config }
    }
}

impl MapWidget for SnapshotMapWidget {
    type Instance = SnapshotInstance;

    fn load_runtime(&self) -> impl Future<Output = ()> + Send {
        let probe_url = self.config.probe_url.clone();
        async move {
            let probe = async {
                let response = reqwest::get(&probe_url).await?;
                response.error_for_status()?;
                Ok::<_, reqwest::Error>(())
            };

            match probe.await {
                Ok(()) => debug!(url = %probe_url, "Tile server reachable"),
                Err(e) => {
                    // Degraded mode: the surface stays unmounted and all
                    // buffered calls remain pending.
                    warn!(url = %probe_url, error = %e, "Tile server unreachable; map stays unmounted");
                    std::future::pending::<()>().await;
                }
            }
        }
    }

    fn create_instance(&self, options: &MapOptions) -> SnapshotInstance {
        SnapshotInstance {
            center: options.center,
            zoom: options.zoom,
            layer: MarkerLayer::empty(),
            config: self.config.clone(),
        }
    }
}

/// A live snapshot viewport.
pub struct SnapshotInstance {
    center: Coordinates,
    zoom: u8,
    layer: MarkerLayer,
    config: SnapshotConfig,
}

impl MapInstance for SnapshotInstance {
    fn set_view(&mut self, center: Coordinates) {
        self.center = center;
    }

    fn replace_markers(&mut self, layer: MarkerLayer) {
        self.layer = layer;
    }

    fn center(&self) -> Coordinates {
        self.center
    }

    fn marker_count(&self) -> usize {
        self.layer.len()
    }

    /// Renders the viewport and markers to the configured PNG path.
    ///
    /// Fetches base-map tiles synchronously; callers on an async runtime
    /// should dispatch through `spawn_blocking`.
    fn render(&mut self) -> Result<(), MapError> {
        let mut map = StaticMapBuilder::default()
            .width(self.config.width)
            .height(self.config.height)
            .url_template(self.config.tile_url.as_str())
            .lat_center(self.center.lat)
            .lon_center(self.center.lng)
            .zoom(self.zoom)
            .build()
            .map_err(|e| MapError::RenderError(format!("Failed to create map: {}", e)))?;

        for marker in self.layer.markers() {
            // White halo under a solid dot keeps markers visible on any base map
            let halo = CircleBuilder::default()
                .lat_coordinate(marker.position.lat)
                .lon_coordinate(marker.position.lng)
                .color(Color::new(true, 255, 255, 255, 255))
                .radius(7.0)
                .build()
                .map_err(|e| MapError::RenderError(format!("Failed to build marker: {}", e)))?;
            let dot = CircleBuilder::default()
                .lat_coordinate(marker.position.lat)
                .lon_coordinate(marker.position.lng)
                .color(Color::new(true, 41, 98, 255, 255))
                .radius(5.0)
                .build()
                .map_err(|e| MapError::RenderError(format!("Failed to build marker: {}", e)))?;

            map.add_tool(halo);
            map.add_tool(dot);
        }

        map.save_png(&self.config.output_path)
            .map_err(|e| MapError::RenderError(format!("Failed to save snapshot: {}", e)))?;

        debug!(
            path = %self.config.output_path.display(),
            markers = self.layer.len(),
            center = %self.center,
            "Map snapshot rendered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::DEFAULT_CENTER;

    #[test]
    fn test_default_config() {
        let config = SnapshotConfig::default();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 500);
        assert!(config.tile_url.contains("{z}"));
    }

    #[test]
    fn test_instance_tracks_view_and_markers() {
        let widget = SnapshotMapWidget::new(SnapshotConfig::default());
        let mut instance = widget.create_instance(&MapOptions::default());

        assert_eq!(instance.center(), DEFAULT_CENTER);
        assert_eq!(instance.marker_count(), 0);

        let target = Coordinates::new(51.5074, -0.1278).unwrap();
        instance.set_view(target);
        assert_eq!(instance.center(), target);
    }
}
