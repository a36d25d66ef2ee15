//! Fetch bicycle parking records from LTA DataMall into an NDJSON file.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pitstop_server::config::{datamall_account_key, load_dotenv};
use pitstop_server::parking::datamall::read_seed_locations;
use pitstop_server::parking::ingest::write_ndjson;
use pitstop_server::parking::{DataMallClient, DataMallConfig};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// JSON array of seed locations (ID, Latitude, Longitude, Description)
    #[arg(short, long, default_value = "data/locations.json")]
    locations: PathBuf,

    /// Where to write the records
    #[arg(short, long, default_value = "data/bicycle_parking_data.ndjson")]
    output: PathBuf,

    /// Seconds to wait between requests
    #[arg(long, default_value_t = 1)]
    delay_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let started = Instant::now();

    let account_key = datamall_account_key()?;
    let seeds = read_seed_locations(&cli.locations)?;
    info!(count = seeds.len(), path = %cli.locations.display(), "loaded seed locations");

    let client = DataMallClient::new(
        DataMallConfig::new(account_key)
            .with_request_delay(std::time::Duration::from_secs(cli.delay_secs)),
    )
    .context("failed to create DataMall client")?;

    let report = client.fetch_all(&seeds).await;

    write_ndjson(&cli.output, &report.records)?;

    info!(
        records = report.records.len(),
        succeeded = report.succeeded,
        failed = report.failed,
        locations = seeds.len(),
        elapsed_s = started.elapsed().as_secs_f64(),
        output = %cli.output.display(),
        "fetch completed"
    );
    Ok(())
}
