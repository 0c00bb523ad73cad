//! Map surface and widget abstraction.
//!
//! Presents a geographic viewport with point markers while isolating the
//! rest of the system from any concrete map widget:
//!
//! - [`MapWidget`] / [`MapInstance`] - the injected map-provider capability
//! - [`MapSurface`] - lifecycle owner (mount, recenter, markers, unmount)
//! - [`RuntimeGate`] - process-wide single-flight guard for the widget's
//!   remote runtime assets
//! - [`MarkerLayer`] - the disposable full-replace marker set
//! - [`SnapshotMapWidget`] - concrete widget rendering PNG snapshots from
//!   OpenStreetMap tiles
//!
//! # Lifecycle
//!
//! ```text
//! mount() ──► RuntimeGate (shared, load once) ──► create instance
//!    │                                               │
//!    │  set_center / set_markers before mount        │
//!    │  are buffered and applied here ───────────────┘
//!    │
//! unmount() ──► destroyed flag; a still-pending mount observes it
//!               and abandons itself without touching the widget
//! ```

mod marker;
mod runtime;
mod snapshot;
mod surface;
mod widget;

pub use marker::{Marker, MarkerLayer};
pub use runtime::RuntimeGate;
pub use snapshot::{SnapshotConfig, SnapshotMapWidget};
pub use surface::MapSurface;
pub use widget::{MapError, MapInstance, MapOptions, MapWidget};

#[cfg(test)]
pub(crate) use surface::tests;
