//! Search command - one-shot nearby search printed to stdout.

use std::path::PathBuf;

use clap::Args;

use barbermap::config::ConfigFile;
use barbermap::coord::Coordinates;
use barbermap::geolocate::{GeoLocator, IpGeoLocator};
use barbermap::map::{MapInstance, MapOptions, MapWidget, SnapshotConfig, SnapshotMapWidget};
use barbermap::provider::SearchProvider;
use barbermap::shop::Shop;

use crate::error::CliError;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Free-text query (e.g. "fade")
    #[arg(long, default_value = "")]
    pub query: String,

    /// Latitude to search around (geolocates if omitted)
    #[arg(long, requires = "lng")]
    pub lat: Option<f64>,

    /// Longitude to search around (geolocates if omitted)
    #[arg(long, requires = "lat")]
    pub lng: Option<f64>,

    /// Also render a PNG map snapshot to this path
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Config file path (default: ~/.barbermap/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the search command.
pub fn run(args: SearchArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    let provider = super::build_provider(&config)?;

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Terminal)?;

    let (center, shops) = runtime.block_on(async {
        let center = resolve_center(&args, &config).await?;
        let shops = provider.find_nearby(center, &args.query).await?;
        Ok::<_, CliError>((center, shops))
    })?;

    print_results(center, &args.query, &shops);

    if let Some(path) = args.snapshot {
        render_snapshot(&config, center, &shops, path)?;
    }

    Ok(())
}

/// Explicit coordinates win; otherwise geolocate, falling back to the
/// configured default center.
async fn resolve_center(args: &SearchArgs, config: &ConfigFile) -> Result<Coordinates, CliError> {
    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        return Coordinates::new(lat, lng).map_err(|e| {
            CliError::Geolocate(barbermap::geolocate::GeolocateError::Failed(e.to_string()))
        });
    }

    let locator = IpGeoLocator::new().map_err(CliError::Geolocate)?;
    match locator.locate().await {
        Ok(coords) => Ok(coords),
        Err(e) => {
            eprintln!(
                "Geolocation unavailable ({}), using default center {}",
                e, config.search.default_center
            );
            Ok(config.search.default_center)
        }
    }
}

fn print_results(center: Coordinates, query: &str, shops: &[Shop]) {
    println!("Searching near {}", center);
    if !query.is_empty() {
        println!("Query: {}", query);
    }
    println!();

    if shops.is_empty() {
        println!("No barbershops found.");
        return;
    }

    println!("Found {} barbershop(s):", shops.len());
    for shop in shops {
        let rating = if shop.rating > 0.0 {
            format!("{:.1}★", shop.rating)
        } else {
            "unrated".to_string()
        };
        if shop.address.is_empty() {
            println!("  {} ({})", shop.name, rating);
        } else {
            println!("  {} ({}) - {}", shop.name, rating, shop.address);
        }
    }
}

/// Render a one-off snapshot without going through a session.
fn render_snapshot(
    config: &ConfigFile,
    center: Coordinates,
    shops: &[Shop],
    path: PathBuf,
) -> Result<(), CliError> {
    let mut snapshot_config = SnapshotConfig {
        width: config.map.width,
        height: config.map.height,
        output_path: path.clone(),
        ..SnapshotConfig::default()
    };
    if let Some(url) = &config.map.tile_url {
        snapshot_config.tile_url = url.clone();
    }

    let widget = SnapshotMapWidget::new(snapshot_config);
    let options = MapOptions {
        center,
        ..MapOptions::default()
    };
    let mut instance = widget.create_instance(&options);
    instance.replace_markers(barbermap::map::MarkerLayer::from_shops(shops));
    instance.render()?;

    println!();
    println!("Snapshot saved: {}", path.display());
    Ok(())
}
