mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vetnear_core::Category;

#[derive(Debug, Parser)]
#[command(name = "vetnear-cli")]
#[command(about = "Find veterinary clinics and animal shelters near a location")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for veterinarians and shelters/NGOs around a point
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in km (defaults to `VETNEAR_DEFAULT_RADIUS_KM`)
        #[arg(long)]
        radius: Option<f64>,
        /// Print the full result bundle as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a point to city/state/country
    Reverse {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Print the Overpass QL query for a search without sending it
    Query {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long)]
        radius: Option<f64>,
        /// veterinary | animal_shelter (aliases: vets, ngos)
        #[arg(long)]
        category: Category,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vetnear_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Nearby {
            lat,
            lon,
            radius,
            json,
        } => search::run_nearby(&config, lat, lon, radius, json).await?,
        Commands::Reverse { lat, lon } => search::run_reverse(&config, lat, lon).await?,
        Commands::Query {
            lat,
            lon,
            radius,
            category,
        } => search::run_query(&config, lat, lon, radius, category)?,
    }

    Ok(())
}
