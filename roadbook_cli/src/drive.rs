use std::{path::PathBuf, time::Duration};

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use geo_types::{LineString, Point};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use roadbook_directions::{
    cache::CachedDirections,
    crow_flies::{CrowFliesDirections, DEFAULT_SPEED_KMH},
    google::{GOOGLE_DIRECTIONS_API_URL, GoogleDirectionsClient, GoogleDirectionsClientParams},
    provider::DirectionsProvider,
};
use roadbook_drive::{
    driver::TourDriver,
    geojson::GeoJsonRenderer,
    params::{BackoffPolicy, DEFAULT_BATCH_SIZE, DriveParams},
    render::TourRenderer,
    summary::TourSummary,
};
use roadbook_tour::{csv, kmh::Kmh, tour::TourRoute};

pub const API_KEY_ENV_VAR: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Args)]
pub struct DriveArgs {
    /// Tour CSV with name, state, lat and lon columns
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Google Directions API key, defaults to $GOOGLE_MAPS_API_KEY
    #[arg(long)]
    api_key: Option<String>,

    /// Route offline with straight lines instead of a live provider
    #[arg(long)]
    offline: bool,

    /// Average speed for offline routing, in km/h
    #[arg(long, default_value_t = DEFAULT_SPEED_KMH, value_parser = crate::parsers::parse_speed)]
    speed_kmh: f64,

    /// Waypoints per request
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Initial inter-request delay (e.g. "250ms", "2s"), randomized
    /// between 50 and 150 ms when omitted
    #[arg(long, value_parser = crate::parsers::parse_duration)]
    initial_delay: Option<Duration>,

    /// Give up after this many consecutive rate-limited retries
    #[arg(long)]
    max_retries: Option<u32>,

    /// Cache provider responses in this directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Write routes and markers to a GeoJSON file
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: DriveArgs) -> anyhow::Result<()> {
    let tour = csv::read_tour(&args.input)?;
    info!(
        "Loaded {} waypoints from {}",
        tour.len(),
        args.input.display()
    );

    let params = DriveParams {
        batch_size: args.batch_size,
        backoff: BackoffPolicy {
            initial_delay: args.initial_delay,
            max_consecutive_retries: args.max_retries,
            ..BackoffPolicy::default()
        },
        ..DriveParams::default()
    };

    if args.offline {
        let provider = CrowFliesDirections::new(Kmh::new(args.speed_kmh));
        return drive_tour(provider, &tour, params, &args).await;
    }

    let api_key = match args
        .api_key
        .clone()
        .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
    {
        Some(key) => key,
        None => anyhow::bail!(
            "No API key: pass --api-key or set {API_KEY_ENV_VAR}, or use --offline"
        ),
    };

    let client = GoogleDirectionsClient::new(GoogleDirectionsClientParams {
        api_key,
        base_url: GOOGLE_DIRECTIONS_API_URL.to_string(),
    });

    match &args.cache_dir {
        Some(dir) => drive_tour(CachedDirections::new(client, dir), &tour, params, &args).await,
        None => drive_tour(client, &tour, params, &args).await,
    }
}

async fn drive_tour<P: DirectionsProvider>(
    provider: P,
    tour: &TourRoute,
    params: DriveParams,
    args: &DriveArgs,
) -> anyhow::Result<()> {
    let driver = TourDriver::new(provider, params);

    let token = driver.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping before the next segment");
            token.cancel();
        }
    });

    let mut renderer = CliRenderer::new(args.geojson.is_some(), args.json);
    let summary = driver.drive(tour, &mut renderer).await?;

    renderer.bar.finish_and_clear();

    if let Some(path) = &args.geojson {
        if let Some(geojson) = &renderer.geojson {
            geojson.write_to(path)?;
            info!(
                "Wrote {} features to {}",
                geojson.feature_count(),
                path.display()
            );
        }
    }

    report(&summary, args.json)
}

fn report(summary: &TourSummary, json: bool) -> anyhow::Result<()> {
    for failure in &summary.error_log {
        warn!(
            "Segment {}..{} (batch {}) failed: {}",
            failure.start_index, failure.end_index, failure.batch, failure.kind
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }

    Ok(())
}

struct CliRenderer {
    bar: ProgressBar,
    geojson: Option<GeoJsonRenderer>,
    quiet: bool,
}

impl CliRenderer {
    fn new(collect_geojson: bool, quiet: bool) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(ProgressStyle::default_bar().template("{msg}").unwrap());

        Self {
            bar,
            geojson: collect_geojson.then(GeoJsonRenderer::new),
            quiet,
        }
    }
}

impl TourRenderer for CliRenderer {
    fn display_route(&mut self, geometry: &LineString, color: &str) {
        if let Some(geojson) = &mut self.geojson {
            geojson.display_route(geometry, color);
        }
    }

    fn place_marker(&mut self, position: Point, label: Option<&str>, color: &str) {
        if let Some(geojson) = &mut self.geojson {
            geojson.place_marker(position, label, color);
        }
    }

    fn update_progress(&mut self, text: &str) {
        self.bar.set_message(text.to_string());
    }

    fn update_summary(&mut self, start: &str, end: &str, distance_km: f64, duration: &str) {
        if self.quiet {
            return;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Start", "Finish", "Distance", "Driving time"]);
        table.add_row(vec![
            start.to_string(),
            end.to_string(),
            format!("{distance_km:.1} km"),
            duration.to_string(),
        ]);

        self.bar.println(table.to_string());
    }

    fn show_error(&mut self, message: &str) {
        self.bar.println(format!("error: {message}"));
    }
}
