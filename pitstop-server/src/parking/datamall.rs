//! LTA DataMall bicycle parking client.
//!
//! The feed only answers radius queries, so the catalogue is assembled by
//! querying around a list of seed locations spread over the island.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::{info, warn};

use super::error::{DataMallError, IngestError};
use super::ingest::ParkingRecord;

/// Default base URL for the DataMall API.
const DEFAULT_BASE_URL: &str = "https://datamall2.mytransport.sg/ltaodataservice";

/// Search radius around each seed location, in kilometers.
const DEFAULT_DIST_KM: u32 = 5;

/// A point around which parking records are requested.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeedLocation {
    #[serde(rename = "ID")]
    pub id: serde_json::Value,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub description: String,
}

/// Read seed locations from a JSON array file.
pub fn read_seed_locations(path: &Path) -> Result<Vec<SeedLocation>, IngestError> {
    let contents = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|e| IngestError::Json {
        message: e.to_string(),
    })
}

/// Wrapper for the `BicycleParkingv2` response.
#[derive(Debug, Deserialize)]
struct BicycleParkingResponse {
    #[serde(default)]
    value: Vec<ParkingRecord>,
}

/// Configuration for the DataMall client.
#[derive(Debug, Clone)]
pub struct DataMallConfig {
    /// Value for the `AccountKey` header
    pub account_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Search radius in kilometers
    pub dist_km: u32,
    /// Pause between consecutive seed requests
    pub request_delay: Duration,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DataMallConfig {
    /// Create a new config with the given account key.
    pub fn new(account_key: impl Into<String>) -> Self {
        Self {
            account_key: account_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            dist_km: DEFAULT_DIST_KM,
            request_delay: Duration::from_secs(1),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the pause between seed requests.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

/// Outcome of fetching every seed location.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub records: Vec<ParkingRecord>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Client for the DataMall bicycle parking feed.
#[derive(Debug, Clone)]
pub struct DataMallClient {
    http: reqwest::Client,
    base_url: String,
    dist_km: u32,
    request_delay: Duration,
}

impl DataMallClient {
    /// Create a new DataMall client.
    pub fn new(config: DataMallConfig) -> Result<Self, DataMallError> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&config.account_key).map_err(|_| DataMallError::Api {
            status: 0,
            message: "Invalid account key format".to_string(),
        })?;
        headers.insert(HeaderName::from_static("accountkey"), key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            dist_km: config.dist_km,
            request_delay: config.request_delay,
        })
    }

    /// Fetch the parking records within the configured radius of a point.
    pub async fn bicycle_parking(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<ParkingRecord>, DataMallError> {
        let url = format!("{}/BicycleParkingv2", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("Lat", lat.to_string()),
                ("Long", lon.to_string()),
                ("Dist", self.dist_km.to_string()),
            ])
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataMallError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataMallError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }

    /// Fetch records around every seed location in turn.
    ///
    /// A failed location is logged and counted; the run carries on.
    pub async fn fetch_all(&self, seeds: &[SeedLocation]) -> FetchReport {
        let mut report = FetchReport::default();

        for (i, seed) in seeds.iter().enumerate() {
            info!(
                location = i + 1,
                total = seeds.len(),
                id = %seed.id,
                description = %seed.description,
                "fetching bicycle parking"
            );

            match self.bicycle_parking(seed.latitude, seed.longitude).await {
                Ok(records) => {
                    info!(count = records.len(), "retrieved bicycle parking records");
                    report.succeeded += 1;
                    report.records.extend(records);
                }
                Err(e) => {
                    warn!(id = %seed.id, error = %e, "failed to fetch location");
                    report.failed += 1;
                }
            }

            if i + 1 < seeds.len() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        report
    }
}

fn parse_response(body: &str) -> Result<Vec<ParkingRecord>, DataMallError> {
    let response: BicycleParkingResponse =
        serde_json::from_str(body).map_err(|e| DataMallError::Json {
            message: e.to_string(),
        })?;
    Ok(response.value)
}
