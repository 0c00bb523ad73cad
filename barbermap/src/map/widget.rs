//! Map widget capability traits.
//!
//! [`MapWidget`] is the injected map-provider seam: the surface never talks
//! to a concrete mapping library directly, so the widget can be swapped for
//! a recording mock in tests or a different renderer later.

use std::future::Future;

use thiserror::Error;

use crate::coord::{Coordinates, DEFAULT_CENTER};
use crate::map::MarkerLayer;

/// Default zoom for a freshly mounted viewport.
pub const DEFAULT_ZOOM: u8 = 15;

/// Errors from map surface operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// `mount` called while a mount is pending or resolved. Programmer error.
    #[error("Map surface is already mounted")]
    AlreadyMounted,

    /// `mount` called after `unmount`.
    #[error("Map surface has been destroyed")]
    Destroyed,

    /// The widget failed to draw.
    #[error("Render failed: {0}")]
    RenderError(String),
}

/// Options for constructing a widget instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Viewport center at creation.
    pub center: Coordinates,
    /// Zoom level; recentering never changes it.
    pub zoom: u8,
    /// Scroll-to-zoom gesture. Disabled by default so a scroll over the map
    /// on a touch device does not zoom accidentally.
    pub scroll_wheel_zoom: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            scroll_wheel_zoom: false,
        }
    }
}

/// A concrete map widget (the third-party mapping library seam).
pub trait MapWidget: Send + Sync + 'static {
    /// The live widget instance type.
    type Instance: MapInstance;

    /// Loads the widget's process-wide runtime assets.
    ///
    /// Called at most once per process through [`super::RuntimeGate`].
    /// If the assets cannot be loaded this future must not resolve; mounts
    /// then stay pending indefinitely (accepted degraded mode, no retry).
    fn load_runtime(&self) -> impl Future<Output = ()> + Send;

    /// Constructs a widget instance bound to the given options.
    fn create_instance(&self, options: &MapOptions) -> Self::Instance;
}

/// A live widget instance owned by a mounted surface.
///
/// Dropping the instance destroys the widget and all owned markers.
pub trait MapInstance: Send + 'static {
    /// Recenters the viewport without changing zoom.
    fn set_view(&mut self, center: Coordinates);

    /// Destroys the previous marker layer and installs the new one.
    ///
    /// Sole mechanism for marker mutation; no incremental add/remove.
    fn replace_markers(&mut self, layer: MarkerLayer);

    /// Current viewport center.
    fn center(&self) -> Coordinates;

    /// Number of markers currently drawn.
    fn marker_count(&self) -> usize;

    /// Redraws the current viewport and markers.
    fn render(&mut self) -> Result<(), MapError>;
}
