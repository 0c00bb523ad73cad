//! Map surface lifecycle management.
//!
//! [`MapSurface`] owns one widget instance and mediates every mutation:
//! mounting (asynchronous, gated on the shared runtime), recentering,
//! wholesale marker replacement, and teardown. Calls issued before the
//! mount resolves are buffered and applied once it does; teardown while a
//! mount is still pending flips a destroyed flag that the pending mount
//! checks before touching the widget.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::marker::MarkerLayer;
use super::runtime::RuntimeGate;
use super::widget::{MapError, MapInstance, MapOptions, MapWidget};
use crate::coord::Coordinates;
use crate::shop::Shop;

/// Surface lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Created, not yet mounted.
    Idle,
    /// Mount spawned, runtime load or instance creation pending.
    Mounting,
    /// Widget instance live.
    Mounted,
    /// Torn down; terminal.
    Destroyed,
}

/// State shared between the surface handle and its pending mount task.
struct SurfaceState<I> {
    phase: Phase,
    instance: Option<I>,
    /// Center requested before the mount resolved.
    pending_center: Option<Coordinates>,
    /// Marker layer requested before the mount resolved (latest wins).
    pending_markers: Option<MarkerLayer>,
}

/// A geographic viewport with a replaceable marker layer.
///
/// All methods take `&self`; the surface can be shared behind an `Arc`
/// between the session sync task and the UI.
pub struct MapSurface<W: MapWidget> {
    widget: Arc<W>,
    runtime: Arc<RuntimeGate>,
    options: MapOptions,
    state: Arc<Mutex<SurfaceState<W::Instance>>>,
}

impl<W: MapWidget> MapSurface<W> {
    /// Creates an unmounted surface.
    ///
    /// `runtime` is the process-wide gate shared by all surfaces using the
    /// same widget, so concurrent mounts coalesce into one asset load.
    pub fn new(widget: Arc<W>, runtime: Arc<RuntimeGate>, options: MapOptions) -> Self {
        Self {
            widget,
            runtime,
            options,
            state: Arc::new(Mutex::new(SurfaceState {
                phase: Phase::Idle,
                instance: None,
                pending_center: None,
                pending_markers: None,
            })),
        }
    }

    /// Begins mounting the surface.
    ///
    /// The returned handle resolves when the mount completes or abandons
    /// itself; in degraded mode (runtime assets unreachable) it never
    /// resolves. Calling `mount` twice without an intervening `unmount` is
    /// a programmer error and fails loudly.
    pub fn mount(&self) -> Result<JoinHandle<()>, MapError> {
        {
            let mut state = self.state.lock().unwrap();
            match state.phase {
                Phase::Idle => state.phase = Phase::Mounting,
                Phase::Mounting | Phase::Mounted => {
                    error!("mount() called on an already-mounted map surface");
                    return Err(MapError::AlreadyMounted);
                }
                Phase::Destroyed => return Err(MapError::Destroyed),
            }
        }

        let widget = Arc::clone(&self.widget);
        let runtime = Arc::clone(&self.runtime);
        let shared = Arc::clone(&self.state);
        let mut options = self.options.clone();

        Ok(tokio::spawn(async move {
            runtime.ensure_loaded(|| widget.load_runtime()).await;

            let mut state = shared.lock().unwrap();
            if state.phase == Phase::Destroyed {
                // Torn down while the runtime was loading; the container is
                // gone, so the mount abandons itself.
                debug!("Pending mount abandoned after unmount");
                return;
            }

            if let Some(center) = state.pending_center.take() {
                options.center = center;
            }
            let mut instance = widget.create_instance(&options);
            if let Some(layer) = state.pending_markers.take() {
                instance.replace_markers(layer);
            }

            state.instance = Some(instance);
            state.phase = Phase::Mounted;
            debug!(center = %options.center, zoom = options.zoom, "Map surface mounted");
        }))
    }

    /// Recenters the viewport without changing zoom.
    ///
    /// Before the mount resolves this buffers the value (latest wins) and
    /// applies it on mount. After `unmount` it is a silent no-op.
    pub fn set_center(&self, center: Coordinates) {
        let mut state = self.state.lock().unwrap();
        match state.phase {
            Phase::Mounted => {
                if let Some(instance) = state.instance.as_mut() {
                    instance.set_view(center);
                }
            }
            Phase::Idle | Phase::Mounting => state.pending_center = Some(center),
            Phase::Destroyed => {}
        }
    }

    /// Replaces the marker layer with one marker per shop.
    ///
    /// The previous layer is destroyed in full; there is deliberately no
    /// incremental path, so markers can never reference stale shops.
    pub fn set_markers(&self, shops: &[Shop]) {
        let layer = MarkerLayer::from_shops(shops);
        let mut state = self.state.lock().unwrap();
        match state.phase {
            Phase::Mounted => {
                if let Some(instance) = state.instance.as_mut() {
                    instance.replace_markers(layer);
                }
            }
            Phase::Idle | Phase::Mounting => state.pending_markers = Some(layer),
            Phase::Destroyed => {}
        }
    }

    /// Tears down the surface, destroying the instance and all markers.
    ///
    /// Safe to call while a mount is still pending: the flag set here makes
    /// the pending mount abandon itself instead of constructing a widget
    /// for a destroyed container.
    pub fn unmount(&self) {
        let mut state = self.state.lock().unwrap();
        state.phase = Phase::Destroyed;
        state.pending_center = None;
        state.pending_markers = None;
        if state.instance.take().is_some() {
            debug!("Map surface unmounted");
        }
    }

    /// Whether a widget instance is currently live.
    pub fn is_mounted(&self) -> bool {
        self.state.lock().unwrap().phase == Phase::Mounted
    }

    /// Current viewport center, if mounted.
    pub fn center(&self) -> Option<Coordinates> {
        let state = self.state.lock().unwrap();
        state.instance.as_ref().map(|i| i.center())
    }

    /// Number of markers currently drawn, if mounted.
    pub fn marker_count(&self) -> Option<usize> {
        let state = self.state.lock().unwrap();
        state.instance.as_ref().map(|i| i.marker_count())
    }

    /// Redraws the widget (snapshot widgets write their output here).
    ///
    /// A no-op before mount and after unmount.
    pub fn render(&self) -> Result<(), MapError> {
        let mut state = self.state.lock().unwrap();
        match state.instance.as_mut() {
            Some(instance) => instance.render(),
            None => Ok(()),
        }
    }
}
