//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use barbermap::config::ConfigFileError;
use barbermap::geolocate::GeolocateError;
use barbermap::map::MapError;
use barbermap::provider::ProviderError;
use barbermap::session::SessionError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to start or run the discovery session
    Session(SessionError),
    /// Search request failed
    Search(ProviderError),
    /// Geolocation failed when explicitly requested
    Geolocate(GeolocateError),
    /// Snapshot rendering failed
    Render(MapError),
    /// Terminal UI error
    Terminal(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Search(_) => {
                eprintln!();
                eprintln!("Make sure the shop backend is reachable:");
                eprintln!("  1. Check backend.base_url in ~/.barbermap/config.ini");
                eprintln!("  2. Verify the server is running (default: http://localhost:3001)");
            }
            CliError::Render(_) => {
                eprintln!();
                eprintln!("Snapshot rendering needs the tile server to be reachable.");
                eprintln!("Check your network connection or map.tile_url in config.ini.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Session(e) => write!(f, "Session error: {}", e),
            CliError::Search(e) => write!(f, "Search failed: {}", e),
            CliError::Geolocate(e) => write!(f, "Geolocation failed: {}", e),
            CliError::Render(e) => write!(f, "Snapshot failed: {}", e),
            CliError::Terminal(e) => write!(f, "Terminal error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Session(e) => Some(e),
            CliError::Search(e) => Some(e),
            CliError::Geolocate(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::Terminal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        CliError::Session(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Search(e)
    }
}

impl From<MapError> for CliError {
    fn from(e: MapError) -> Self {
        CliError::Render(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Terminal(e)
    }
}
