//! Bulk loading of parking records into the store.
//!
//! Records from the open-data feed are kept as newline-delimited JSON
//! between the fetch and load steps. Loading upserts by description in
//! fixed-size batches; a failed batch is rolled back and counted without
//! stopping the run.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};

use super::error::IngestError;
use super::schema::TABLE_NAME;

/// Records per upsert transaction.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

const UPSERT_QUERY: &str = r#"
    INSERT INTO parking_spots (description, coordinates, rack_type, rack_count, shelter_indicator)
    VALUES ($1, ST_SetSRID(ST_MakePoint($2, $3), 4326), $4, $5, $6)
    ON CONFLICT (description)
    DO UPDATE SET
        coordinates = EXCLUDED.coordinates,
        rack_type = EXCLUDED.rack_type,
        rack_count = EXCLUDED.rack_count,
        shelter_indicator = EXCLUDED.shelter_indicator;
"#;

/// One bicycle parking record as published by the open-data feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParkingRecord {
    /// Free-text description; the upsert key.
    pub description: String,

    pub latitude: f64,

    pub longitude: f64,

    pub rack_type: Option<String>,

    pub rack_count: Option<u32>,

    /// "Y" or "N".
    pub shelter_indicator: Option<String>,
}

impl ParkingRecord {
    /// Whether the feed marks the racks as sheltered.
    pub fn is_sheltered(&self) -> bool {
        self.shelter_indicator
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("y"))
    }
}

/// Outcome of a load run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records submitted.
    pub records: usize,
    /// Batches attempted.
    pub batches: usize,
    /// Batches rolled back.
    pub failed_batches: usize,
    /// Rows inserted or updated by successful batches.
    pub rows_affected: u64,
}

/// Read records from an NDJSON file.
///
/// Blank lines are ignored; lines that fail to parse are logged and skipped.
pub fn read_ndjson(path: &Path) -> Result<Vec<ParkingRecord>, IngestError> {
    let contents = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_ndjson(&contents))
}

fn parse_ndjson(contents: &str) -> Vec<ParkingRecord> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| match serde_json::from_str(line.trim()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(line = i + 1, error = %e, "skipping invalid record");
                None
            }
        })
        .collect()
}

/// Write records to an NDJSON file, replacing it.
///
/// Creates parent directories if they don't exist.
pub fn write_ndjson(path: &Path, records: &[ParkingRecord]) -> Result<(), IngestError> {
    let io_err = |source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut out = Vec::new();
    for record in records {
        serde_json::to_writer(&mut out, record).map_err(|e| IngestError::Json {
            message: e.to_string(),
        })?;
        out.push(b'\n');
    }

    let mut file = std::fs::File::create(path).map_err(io_err)?;
    file.write_all(&out).map_err(io_err)?;
    Ok(())
}

/// Upsert records into the store in batches of `batch_size`.
///
/// Fails early only if the database is unreachable or the table is missing.
pub async fn load(
    pool: &PgPool,
    records: &[ParkingRecord],
    batch_size: usize,
) -> Result<IngestReport, IngestError> {
    ensure_table(pool).await?;

    let mut report = IngestReport {
        records: records.len(),
        ..IngestReport::default()
    };

    for (i, batch) in records.chunks(batch_size.max(1)).enumerate() {
        report.batches += 1;
        info!(batch = i + 1, records = batch.len(), "processing batch");

        match upsert_batch(pool, batch).await {
            Ok(rows) => {
                report.rows_affected += rows;
                info!(batch = i + 1, rows, "batch completed");
            }
            Err(e) => {
                report.failed_batches += 1;
                warn!(batch = i + 1, error = %e, "batch failed");
            }
        }
    }

    Ok(report)
}

async fn ensure_table(pool: &PgPool) -> Result<(), IngestError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_name = $1);",
    )
    .bind(TABLE_NAME)
    .fetch_one(pool)
    .await?;

    if !exists {
        return Err(IngestError::MissingTable(TABLE_NAME));
    }
    Ok(())
}

/// Upsert one batch in a single transaction.
async fn upsert_batch(pool: &PgPool, batch: &[ParkingRecord]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut rows = 0;

    for record in batch {
        let result = sqlx::query(UPSERT_QUERY)
            .bind(&record.description)
            .bind(record.longitude)
            .bind(record.latitude)
            .bind(&record.rack_type)
            .bind(record.rack_count.map(|n| i32::try_from(n).unwrap_or(i32::MAX)))
            .bind(record.shelter_indicator.as_ref().map(|_| record.is_sheltered()))
            .execute(&mut *tx)
            .await?;
        rows += result.rows_affected();
    }

    // Dropping the transaction on error rolls it back
    tx.commit().await?;
    Ok(rows)
}
