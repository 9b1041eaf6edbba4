use crate::{
    config::{Config, GeocodingGateway},
    table::Table,
};
use anyhow::Result;
use clap::Parser;
use geobatch_core::{
    entities::CoordinateOutcome,
    gateways::geocode::GeoCodingGateway,
    usecases::{self, BatchResolver},
};
use geobatch_gateways::{
    geocoding::{OpenCage, OpenStreetMap},
    map::{RasterMap, TileServer},
};
use std::{fs::File, io, path::PathBuf};

type DynGeocoder = Box<dyn GeoCodingGateway + Send + Sync>;

/// Resolve the addresses of a CSV column into coordinates
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// CSV file with a header row
    pub input: PathBuf,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Name of the column that contains the addresses
    #[arg(long)]
    pub column: Option<String>,

    /// Number of threads that resolve addresses concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Write the resulting CSV into this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Render the resolved locations into this image file
    #[arg(long, value_name = "FILE", conflicts_with = "no_map")]
    pub map: Option<PathBuf>,

    /// Don't render a map
    #[arg(long)]
    pub no_map: bool,

    /// Draw markers on a blank background instead of map tiles
    #[arg(long)]
    pub no_basemap: bool,
}

pub fn run(args: Args) -> Result<()> {
    let mut cfg = Config::try_load_from_file_or_default(args.config.as_ref())?;
    apply_args(&mut cfg, &args);

    let table = Table::from_path(&args.input)?;
    let addresses = table.column(&cfg.batch.column)?;
    log::info!(
        "Resolving {} addresses of column '{}' from {}",
        addresses.len(),
        cfg.batch.column,
        args.input.display()
    );

    let resolver = BatchResolver::new(geocoding_gateway(cfg.geocoding.gateway.as_ref()));
    let queries: Vec<_> = addresses.into_iter().map(Some).collect();
    let outcomes = resolver.resolve_batch_parallel(&queries, cfg.batch.workers);
    log_summary(&resolver, &outcomes);

    match &args.output {
        Some(path) => {
            table.write_with_coordinates(&outcomes, File::create(path)?)?;
            log::info!("Coordinates written to {}", path.display());
        }
        None => table.write_with_coordinates(&outcomes, io::stdout().lock())?,
    }

    if let Some(path) = &cfg.map.output {
        let basemap = cfg.map.basemap.as_ref().and_then(|basemap| {
            TileServer::try_new(basemap.tile_url.clone(), basemap.timeout)
                .map_err(|err| log::error!("Unable to use the basemap, draw markers only: {err}"))
                .ok()
        });
        let renderer = RasterMap {
            width: cfg.map.width,
            height: cfg.map.height,
            basemap,
            ..Default::default()
        };
        usecases::render_map(&renderer, &outcomes, path)?;
    }
    Ok(())
}

fn apply_args(cfg: &mut Config, args: &Args) {
    if let Some(column) = &args.column {
        cfg.batch.column = column.clone();
    }
    if let Some(workers) = args.workers {
        cfg.batch.workers = workers.max(1);
    }
    if args.no_map {
        cfg.map.output = None;
    } else if let Some(path) = &args.map {
        cfg.map.output = Some(path.clone());
    }
    if args.no_basemap {
        cfg.map.basemap = None;
    }
}

/// Returns `None` if the client could not be initialized.
fn geocoding_gateway(gateway: Option<&GeocodingGateway>) -> Option<DynGeocoder> {
    let Some(gateway) = gateway else {
        log::error!("No geocoding gateway configured");
        return None;
    };
    let client: Result<DynGeocoder, _> = match gateway {
        GeocodingGateway::OpenCage { api_key } => {
            log::info!("Use OpenCage geocoding gateway");
            OpenCage::try_new(api_key.as_str()).map(|gw| Box::new(gw) as DynGeocoder)
        }
        GeocodingGateway::OpenStreetMap { endpoint } => {
            log::info!("Use OpenStreetMap geocoding gateway");
            match endpoint {
                Some(endpoint) => OpenStreetMap::try_with_endpoint(endpoint.as_str())
                    .map(|gw| Box::new(gw) as DynGeocoder),
                None => Ok(Box::new(OpenStreetMap::new()) as DynGeocoder),
            }
        }
    };
    match client {
        Ok(client) => Some(client),
        Err(err) => {
            log::error!("Failed to initialize the geocoding client: {err}");
            None
        }
    }
}

fn log_summary<G>(resolver: &BatchResolver<G>, outcomes: &[CoordinateOutcome])
where
    G: GeoCodingGateway,
{
    let stats = resolver.stats();
    log::info!(
        "{} of {} addresses resolved ({} provider calls, {} cache hits, {} cached queries)",
        stats.resolved,
        outcomes.len(),
        stats.provider_calls,
        stats.cache_hits,
        resolver.cache().len()
    );
    if stats.total_failures() > 0 {
        log::info!("{} lookup(s) failed", stats.total_failures());
    }
    for (kind, count) in &stats.failures {
        log::info!("{count} lookup(s) failed: {}", kind.as_str());
    }
}
