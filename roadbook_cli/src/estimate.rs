use std::path::PathBuf;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use tracing::info;

use roadbook_directions::crow_flies::DEFAULT_SPEED_KMH;
use roadbook_tour::{csv, kmh::Kmh};

#[derive(Args)]
pub struct EstimateArgs {
    /// Tour CSV with name, state, lat and lon columns
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Average speed used for the duration estimate, in km/h
    #[arg(long, default_value_t = DEFAULT_SPEED_KMH, value_parser = crate::parsers::parse_speed)]
    speed_kmh: f64,
}

/// Crow-flies distance table, no provider traffic involved.
pub fn run(args: EstimateArgs) -> anyhow::Result<()> {
    let tour = csv::read_tour(&args.input)?;
    let speed = Kmh::new(args.speed_kmh);

    info!("Estimating {} waypoints at {speed}", tour.len());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["From", "To", "Distance", "Duration"]);

    for pair in tour.waypoints().windows(2) {
        let distance = pair[0].haversine_distance(&pair[1]);

        table.add_row(vec![
            pair[0].label(),
            pair[1].label(),
            format!("{:.1} km", distance.kilometers()),
            format!("{:#}", distance / speed),
        ]);
    }

    let total = tour.crow_flies_distance();
    table.add_row(vec![
        tour.origin().label(),
        tour.destination().label(),
        format!("{:.1} km", total.kilometers()),
        format!("{:#}", total / speed),
    ]);

    println!("{table}");

    Ok(())
}
