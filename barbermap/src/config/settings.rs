//! Configuration structs and default values.

use std::path::PathBuf;

use crate::coord::{Coordinates, DEFAULT_CENTER};

/// Default backend base URL (local development server).
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

/// Default backend request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Default delay before the one-shot seed check, in milliseconds.
pub const DEFAULT_SEED_DELAY_MS: u64 = 800;

/// Default snapshot dimensions in pixels.
pub const DEFAULT_SNAPSHOT_WIDTH: u32 = 800;
pub const DEFAULT_SNAPSHOT_HEIGHT: u32 = 500;

/// Complete user configuration, grouped by INI section.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub backend: BackendSettings,
    pub search: SearchSettings,
    pub map: MapSettings,
    pub logging: LoggingSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            search: SearchSettings::default(),
            map: MapSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// `[backend]` section: where the shop API lives.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSettings {
    /// Base URL of the shop search backend.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// `[search]` section: orchestrator timing and starting viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
    /// Delay before the one-shot seed check, in milliseconds.
    pub seed_delay_ms: u64,
    /// Whether the demo-seed side channel is enabled.
    pub seed_enabled: bool,
    /// Viewport center before geolocation resolves.
    pub default_center: Coordinates,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            seed_delay_ms: DEFAULT_SEED_DELAY_MS,
            seed_enabled: true,
            default_center: DEFAULT_CENTER,
        }
    }
}

/// `[map]` section: snapshot rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    /// Snapshot width in pixels.
    pub width: u32,
    /// Snapshot height in pixels.
    pub height: u32,
    /// Where the rendered PNG is written.
    pub output_path: Option<PathBuf>,
    /// Tile server URL template override.
    pub tile_url: Option<String>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_SNAPSHOT_WIDTH,
            height: DEFAULT_SNAPSHOT_HEIGHT,
            output_path: None,
            tile_url: None,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for log files.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { directory: None }
    }
}
