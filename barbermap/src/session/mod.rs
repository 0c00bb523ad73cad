//! Discovery session facade.
//!
//! Wires the pieces of a running session together and exposes the small
//! API the UI layer actually needs:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      DiscoverySession                        │
//! │                                                              │
//! │   SearchOrchestrator ──watch──► sync task ──► MapSurface     │
//! │        ▲      ▲                                  │           │
//! │   set_query  select_shop ◄───────────────────────┘           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sync task mirrors every state snapshot onto the surface: the
//! viewport recenters to the state's coordinates and the marker layer is
//! replaced wholesale from the result set. The UI never touches the
//! surface directly for data flow; it only reads from it (render) and
//! routes user intent back through the session.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::coord::{CoordError, Coordinates};
use crate::geolocate::GeoLocator;
use crate::map::{MapError, MapOptions, MapSurface, MapWidget, RuntimeGate};
use crate::orchestrator::{OrchestratorConfig, SearchOrchestrator};
use crate::provider::SearchProvider;
use crate::shop::{SearchState, Shop};

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A map surface operation failed.
    #[error("Map error: {0}")]
    Map(#[from] MapError),

    /// A selected shop carried out-of-range coordinates.
    #[error("Invalid shop coordinates: {0}")]
    Coordinates(#[from] CoordError),
}

/// A running discovery session.
///
/// Owns the orchestrator, the map surface, and the task keeping them in
/// sync. Dropping the session without calling [`Self::shutdown`] leaves
/// the daemon running until the runtime shuts down.
pub struct DiscoverySession<W: MapWidget> {
    orchestrator: SearchOrchestrator,
    surface: Arc<MapSurface<W>>,
    sync_handle: JoinHandle<()>,
}

impl<W: MapWidget> DiscoverySession<W> {
    /// Starts a session: spawns the orchestrator, mounts the surface, and
    /// starts mirroring state onto it.
    ///
    /// The mount is asynchronous; until it resolves the sync task's center
    /// and marker updates buffer on the surface and apply on mount.
    pub fn start<S, G>(
        search: Arc<S>,
        geolocator: Arc<G>,
        widget: Arc<W>,
        runtime: Arc<RuntimeGate>,
        config: OrchestratorConfig,
    ) -> Result<Self, SessionError>
    where
        S: SearchProvider,
        G: GeoLocator,
    {
        let options = MapOptions {
            center: config.default_center,
            ..MapOptions::default()
        };
        let surface = Arc::new(MapSurface::new(widget, runtime, options));
        let _mount = surface.mount()?;

        let orchestrator = SearchOrchestrator::spawn(search, geolocator, config);
        let state_rx = orchestrator.subscribe();
        let sync_handle = tokio::spawn(sync_surface(state_rx, Arc::clone(&surface)));

        info!("Discovery session started");

        Ok(Self {
            orchestrator,
            surface,
            sync_handle,
        })
    }

    /// Updates the free-text query (debounced by the orchestrator).
    pub fn set_query(&self, query: impl Into<String>) {
        self.orchestrator.set_query(query);
    }

    /// Moves the viewport center (debounced by the orchestrator).
    pub fn set_coordinates(&self, coords: Coordinates) {
        self.orchestrator.set_coordinates(coords);
    }

    /// Recenters the session on a result-list selection.
    ///
    /// Routes through the orchestrator rather than the surface directly,
    /// so the recenter also re-searches around the selected shop.
    pub fn select_shop(&self, shop: &Shop) -> Result<(), SessionError> {
        let coords = shop.coordinates()?;
        debug!(shop = %shop.name, position = %coords, "Shop selected");
        self.orchestrator.set_coordinates(coords);
        Ok(())
    }

    /// Subscribes to state snapshots (for list views and status lines).
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.orchestrator.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> SearchState {
        self.orchestrator.state()
    }

    /// The session's map surface.
    pub fn surface(&self) -> &Arc<MapSurface<W>> {
        &self.surface
    }

    /// Stops the orchestrator, the sync task, and the surface, in order.
    pub async fn shutdown(self) {
        self.orchestrator.shutdown().await;
        // The watch sender is gone, so the sync task sees the channel close
        // and exits on its own.
        let _ = self.sync_handle.await;
        self.surface.unmount();
        info!("Discovery session stopped");
    }
}

/// Mirrors orchestrator state onto the map surface until the orchestrator
/// shuts down.
async fn sync_surface<W: MapWidget>(
    mut state_rx: watch::Receiver<SearchState>,
    surface: Arc<MapSurface<W>>,
) {
    loop {
        {
            let state = state_rx.borrow_and_update();
            surface.set_center(state.coordinates);
            surface.set_markers(&state.results);
        }
        if state_rx.changed().await.is_err() {
            debug!("State channel closed; surface sync stopping");
            break;
        }
    }
}
