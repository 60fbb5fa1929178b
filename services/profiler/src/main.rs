//! Point wind profile extractor.
//!
//! Resolves the freshest published run of a forecast model, downloads the
//! artifact (or reuses a cached copy on request), extracts per-level wind
//! at the grid cell nearest the target coordinate, and prints a vertical
//! profile at 1000 ft steps in MSL or AGL reference. Each step runs
//! strictly in sequence; the per-probe timeout is the only guard against
//! an unresponsive provider.

mod output;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use forecast_resolver::{
    cached_artifact, download, resolve, resolve_auto, HourRequest, HttpStore, RemoteStore,
    ResolvedRun,
};
use grid_sampler::{nearest_cell, ForecastDecode, Grib2Decoder};
use profiler_common::model::catalog;
use profiler_common::ProfileError;
use terrain::TerrainArchive;
use wind_profile::{build_profile, level_samples, AltitudeReference, ProfileRequest};

use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "profiler")]
#[command(about = "Vertical wind profiles from NWP forecast data")]
struct Args {
    /// Target latitude in decimal degrees (-90 to 90)
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Target longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Profile ceiling in feet (1000 to 50000)
    #[arg(long, default_value = "20000")]
    ceiling: u32,

    /// Model to use: hrrr, rap, gfs, or auto
    #[arg(short, long, default_value = "auto")]
    model: String,

    /// Forecast hour; omit for the latest confirmed data
    #[arg(short = 'f', long)]
    hour: Option<u32>,

    /// Report altitudes above ground level instead of mean sea level
    #[arg(long)]
    agl: bool,

    /// Ground elevation in feet, for AGL without a terrain archive
    #[arg(long, allow_hyphen_values = true)]
    ground_elevation: Option<f64>,

    /// Directory of 1-degree elevation tiles
    #[arg(long, env = "TERRAIN_DIR")]
    terrain_dir: Option<PathBuf>,

    /// Directory for downloaded artifacts
    #[arg(long, env = "CACHE_DIR", default_value = "forecast-cache")]
    cache_dir: PathBuf,

    /// Reuse a cached artifact when present instead of downloading fresh
    #[arg(long)]
    use_cached: bool,

    /// Print raw per-level samples instead of the interpolated profile
    #[arg(long)]
    raw: bool,

    /// Write the profile as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Optional YAML settings file
    #[arg(long, env = "PROFILER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to initialize logging")?;

    let settings = Settings::load(args.config.as_deref());
    run(args, settings).await
}

async fn run(args: Args, settings: Settings) -> Result<()> {
    validate_coordinates(args.lat, args.lon)?;

    let request = match args.hour {
        Some(hour) => HourRequest::At(hour),
        None => HourRequest::Latest,
    };
    let store = HttpStore::new(
        settings.base_url.clone(),
        settings.probe_timeout(),
        settings.fetch_timeout(),
    )?;
    let now = Utc::now();

    let resolved = if args.model.eq_ignore_ascii_case("auto") {
        resolve_auto(
            &store,
            &settings.priority_models(),
            args.lat,
            args.lon,
            request,
            now,
        )
        .await?
    } else {
        let model = catalog::by_id(&args.model).ok_or_else(|| {
            ProfileError::invalid_input("model", format!("unknown model '{}'", args.model))
        })?;
        if !model.coverage.contains(args.lat, args.lon) {
            return Err(ProfileError::invalid_input(
                "model",
                format!(
                    "{} does not cover {:.4}, {:.4}; use gfs or auto",
                    model.id, args.lat, args.lon
                ),
            )
            .into());
        }
        resolve(&store, &model, request, now).await?
    };

    info!(
        model = %resolved.model.id,
        run = %resolved.run,
        "Resolved forecast run"
    );

    let artifact = obtain_artifact(&store, &resolved, &args).await?;

    let fields = Grib2Decoder
        .decode(&artifact)
        .with_context(|| format!("while decoding {}", artifact.display()))?;
    let cell = nearest_cell(&fields, args.lat, args.lon, resolved.model.lon_convention)?;

    if args.raw {
        let samples = level_samples(&fields, &cell)?;
        output::print_levels(&samples, &resolved, &cell);
        return Ok(());
    }

    let (reference, ground) = if args.agl {
        (
            AltitudeReference::Agl,
            Some(ground_elevation(&args, args.lat, args.lon)?),
        )
    } else {
        (AltitudeReference::Msl, None)
    };

    let profile = build_profile(
        &fields,
        &cell,
        &ProfileRequest {
            ceiling_ft: args.ceiling,
            reference,
            ground_elevation_ft: ground,
        },
        Some(resolved.valid_time()),
    )?;

    output::print_profile(&profile, &resolved, &cell);
    if let Some(path) = &args.csv {
        output::write_csv(&profile, &resolved, &cell, path)?;
        info!(path = %path.display(), "Profile exported");
    }

    Ok(())
}

/// Reuse a cached artifact when asked to, otherwise download. Cache age
/// is surfaced to the user; it never silently refreshes.
async fn obtain_artifact(
    store: &dyn RemoteStore,
    resolved: &ResolvedRun,
    args: &Args,
) -> Result<PathBuf> {
    if args.use_cached {
        if let Some(cached) = cached_artifact(&args.cache_dir, resolved) {
            info!(
                path = %cached.path.display(),
                age_minutes = cached.age.num_minutes(),
                size_mb = cached.size_bytes / (1024 * 1024),
                "Reusing cached artifact"
            );
            return Ok(cached.path);
        }
        warn!("No cached artifact for this run, downloading");
    }

    let path = download(store, resolved, &args.cache_dir).await?;
    Ok(path)
}

/// Ground elevation for AGL profiles: terrain archive first, explicit
/// value as the fallback when no tile covers the target.
fn ground_elevation(args: &Args, lat: f64, lon: f64) -> Result<f64> {
    if let Some(dir) = &args.terrain_dir {
        match TerrainArchive::new(dir).elevation_ft(lat, lon) {
            Ok(elevation) => {
                info!(elevation_ft = elevation, "Ground elevation from terrain archive");
                return Ok(elevation);
            }
            Err(ProfileError::TerrainNotFound { tile, .. }) => {
                warn!(tile = %tile, "No elevation tile, falling back to --ground-elevation");
            }
            Err(e) => return Err(e.into()),
        }
    }

    args.ground_elevation.ok_or_else(|| {
        ProfileError::invalid_input(
            "ground_elevation",
            "AGL profiles need --ground-elevation or a terrain archive tile",
        )
        .into()
    })
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ProfileError::invalid_input(
            "latitude",
            format!("{} outside -90..90", lat),
        )
        .into());
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ProfileError::invalid_input(
            "longitude",
            format!("{} outside -180..180", lon),
        )
        .into());
    }
    Ok(())
}
