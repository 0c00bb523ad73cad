//! Run command - interactive discovery session.
//!
//! Thin front controller: loads configuration, wires the session, and
//! delegates to the TUI event loop (or a headless wait loop for non-TTY
//! environments).

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Args;

use barbermap::config::ConfigFile;
use barbermap::geolocate::IpGeoLocator;
use barbermap::logging::{default_log_dir, default_log_file, init_logging};
use barbermap::map::{RuntimeGate, SnapshotConfig, SnapshotMapWidget};
use barbermap::session::DiscoverySession;

use crate::error::CliError;
use crate::tui_app::{self, TuiAppConfig};

/// Arguments for the run command.
#[derive(Args, Default)]
pub struct RunArgs {
    /// Initial search query
    #[arg(long, default_value = "")]
    pub query: String,

    /// Disable the demo-data seed for empty backends
    #[arg(long)]
    pub no_seed: bool,

    /// Config file path (default: ~/.barbermap/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    let log_dir = config
        .logging
        .directory
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| default_log_dir().to_string());
    let _logging_guard = init_logging(&log_dir, default_log_file())
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    tracing::info!(version = barbermap::VERSION, "barbermap starting");

    let provider = super::build_provider(&config)?;
    let geolocator = Arc::new(IpGeoLocator::new().map_err(CliError::Geolocate)?);

    let mut snapshot_config = SnapshotConfig {
        width: config.map.width,
        height: config.map.height,
        ..SnapshotConfig::default()
    };
    if let Some(path) = &config.map.output_path {
        snapshot_config.output_path = path.clone();
    }
    if let Some(url) = &config.map.tile_url {
        snapshot_config.tile_url = url.clone();
    }
    let widget = Arc::new(SnapshotMapWidget::new(snapshot_config));
    let runtime_gate = Arc::new(RuntimeGate::new());

    let mut orchestrator_config = config.orchestrator_config();
    if args.no_seed {
        orchestrator_config.seed_enabled = false;
    }

    // The session's daemons run on this runtime; the TUI loop stays on the
    // main thread.
    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Terminal)?;

    let session = {
        let _enter = runtime.enter();
        DiscoverySession::start(
            provider,
            geolocator,
            widget,
            runtime_gate,
            orchestrator_config,
        )?
    };

    if !args.query.is_empty() {
        session.set_query(args.query.clone());
    }

    // Signal handler for graceful shutdown
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Terminal(std::io::Error::other(format!(
        "Failed to set signal handler: {}",
        e
    ))))?;

    let snapshot_path = config
        .map
        .output_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "barbermap.png".to_string());

    let result = if atty::is(atty::Stream::Stdout) {
        tui_app::run_tui(TuiAppConfig {
            session: &session,
            shutdown,
            runtime: &runtime,
            initial_query: args.query,
            snapshot_path,
        })
    } else {
        tui_app::run_headless(&session, shutdown)
    };

    runtime.block_on(session.shutdown());
    println!("Goodbye!");

    result
}
