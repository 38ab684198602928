use std::path::PathBuf;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use tracing::info;

use roadbook_drive::params::DEFAULT_BATCH_SIZE;
use roadbook_tour::csv;

#[derive(Args)]
pub struct PlanArgs {
    /// Tour CSV with name, state, lat and lon columns
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Waypoints per directions request
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

/// Preview how a tour will be cut into directions requests.
pub fn run(args: PlanArgs) -> anyhow::Result<()> {
    let tour = csv::read_tour(&args.input)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Batch", "Range", "From", "To", "Stops"]);

    for (batch, slice) in tour.slices(args.batch_size).enumerate() {
        table.add_row(vec![
            (batch + 1).to_string(),
            format!("{}-{}", slice.start_index(), slice.end_index()),
            slice.origin().label(),
            slice.destination().label(),
            slice.waypoint_count().to_string(),
        ]);
    }

    println!("{table}");
    info!(
        "{} waypoints make {} batches of up to {}",
        tour.len(),
        tour.batch_count(args.batch_size),
        args.batch_size
    );

    Ok(())
}
