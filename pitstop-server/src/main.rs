use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pitstop_server::cache::{CacheConfig, CachedOneMapClient};
use pitstop_server::config::{AppConfig, ParkingSource, load_dotenv};
use pitstop_server::onemap::OneMapClient;
use pitstop_server::parking::{InMemoryParkingStore, PgParkingStore, ingest};
use pitstop_server::planner::{PlannerConfig, SpatialOracle};
use pitstop_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let onemap = OneMapClient::new(config.onemap).context("failed to create OneMap client")?;
    let onemap = CachedOneMapClient::new(onemap, &CacheConfig::default());

    match config.parking {
        ParkingSource::Database(database) => {
            // Fail fast if the database is unreachable
            let parking = PgParkingStore::connect(&database)
                .await
                .context("failed to connect to the parking database")?;
            parking
                .init_schema()
                .await
                .context("failed to initialise the parking schema")?;

            serve(config.listen_addr, onemap, parking.clone()).await?;
            parking.close().await;
        }
        ParkingSource::File(path) => {
            let records = ingest::read_ndjson(&path)?;
            let parking = InMemoryParkingStore::from_records(&records);
            if parking.is_empty() {
                warn!(path = %path.display(), "no usable parking records, routes will have no stops");
            }
            info!(
                path = %path.display(),
                spots = parking.len(),
                "serving parking spots from memory"
            );

            serve(config.listen_addr, onemap, parking).await?;
        }
    }

    info!("shut down");
    Ok(())
}

async fn serve<O>(addr: SocketAddr, onemap: CachedOneMapClient, parking: O) -> anyhow::Result<()>
where
    O: SpatialOracle + 'static,
{
    let state = AppState::new(onemap, parking, PlannerConfig::default());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "PitStop API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
