//! Upsert bicycle parking records from an NDJSON file into the database.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pitstop_server::config::{DatabaseConfig, load_dotenv};
use pitstop_server::parking::ingest::{load, read_ndjson};
use pitstop_server::parking::{DEFAULT_BATCH_SIZE, PgParkingStore};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// NDJSON records written by fetch-parking
    #[arg(short, long, default_value = "data/bicycle_parking_data.ndjson")]
    input: PathBuf,

    /// Records per transaction
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Create the table and index first if they are missing
    #[arg(long)]
    init_schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let started = Instant::now();

    let records = read_ndjson(&cli.input)?;
    info!(count = records.len(), path = %cli.input.display(), "read records");
    if records.is_empty() {
        info!("nothing to load");
        return Ok(());
    }

    let config = DatabaseConfig::from_env()?;
    let store = PgParkingStore::connect(&config)
        .await
        .context("failed to connect to the parking database")?;

    if cli.init_schema {
        store.init_schema().await.context("failed to create schema")?;
    }

    let report = load(store.pool(), &records, cli.batch_size).await?;
    store.close().await;

    info!(
        records = report.records,
        batches = report.batches,
        failed_batches = report.failed_batches,
        rows_affected = report.rows_affected,
        elapsed_s = started.elapsed().as_secs_f64(),
        "load completed"
    );

    if report.failed_batches > 0 {
        bail!("{} of {} batches failed", report.failed_batches, report.batches);
    }
    Ok(())
}
