use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{drive::DriveArgs, estimate::EstimateArgs, plan::PlanArgs};

mod drive;
mod estimate;
mod parsers;
mod plan;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a tour through a directions provider
    Drive {
        #[command(flatten)]
        args: DriveArgs,
    },
    /// Report a tour's crow-flies distances
    Estimate {
        #[command(flatten)]
        args: EstimateArgs,
    },
    /// Show how a tour splits into request batches
    Plan {
        #[command(flatten)]
        args: PlanArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Drive { args } => drive::run(args).await,
        Commands::Estimate { args } => estimate::run(args),
        Commands::Plan { args } => plan::run(args),
    }
}
