//! barbermap - location-aware nearby barbershop discovery.
//!
//! This library finds barbershops around a geographic viewport and keeps a
//! map surface in sync with the results: geolocation at startup, debounced
//! re-search as the query or viewport moves, and a marker layer that is
//! replaced wholesale on every result set.
//!
//! # High-Level API
//!
//! For most use cases, the [`session`] module provides a simplified facade:
//!
//! ```ignore
//! use barbermap::session::DiscoverySession;
//!
//! let session = DiscoverySession::start(search, geolocator, widget, runtime, config)?;
//! session.set_query("fade");
//!
//! let mut state_rx = session.subscribe();
//! state_rx.changed().await?;
//! ```

pub mod config;
pub mod coord;
pub mod geolocate;
pub mod logging;
pub mod map;
pub mod orchestrator;
pub mod provider;
pub mod session;
pub mod shop;

/// Version of the barbermap library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
