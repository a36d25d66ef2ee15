//! OneMap HTTP client.
//!
//! Provides async methods for the OneMap routing and search services.
//! Handles bearer authentication and limits concurrent requests.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::Coordinate;

use super::error::OneMapError;
use super::token::{PasswordTokenSource, TokenCache};
use super::types::{RouteResponse, SearchResponse};

/// Default base URL for OneMap.
pub const DEFAULT_BASE_URL: &str = "https://www.onemap.gov.sg";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Configuration for the OneMap client.
#[derive(Debug, Clone)]
pub struct OneMapConfig {
    /// Account email for token requests
    pub email: String,
    /// Account password for token requests
    pub password: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OneMapConfig {
    /// Create a new config with the given account credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OneMap API client.
pub struct OneMapClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
    tokens: TokenCache<PasswordTokenSource>,
}

impl OneMapClient {
    /// Create a new OneMap client with the given configuration.
    pub fn new(config: OneMapConfig) -> Result<Self, OneMapError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let source = PasswordTokenSource::new(
            http.clone(),
            &config.base_url,
            config.email,
            config.password,
        );

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
            tokens: TokenCache::new(source),
        })
    }

    /// Get cycling routes between two points.
    ///
    /// The response holds the primary route and any alternates.
    pub async fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteResponse, OneMapError> {
        let url = format!("{}/api/public/routingsvc/route", self.base_url);
        let query = [
            ("start", start.to_lat_lon()),
            ("end", end.to_lat_lon()),
            ("routeType", "cycle".to_string()),
        ];

        debug!(%start, %end, "requesting cycling route");
        self.get_json(&url, &query).await
    }

    /// Free-text location search.
    ///
    /// Returns the provider's result objects unmodified.
    pub async fn search(&self, search_val: &str, page: u32) -> Result<Vec<Value>, OneMapError> {
        let url = format!("{}/api/common/elastic/search", self.base_url);
        let query = [
            ("searchVal", search_val.to_string()),
            ("returnGeom", "Y".to_string()),
            ("getAddrDetails", "Y".to_string()),
            ("pageNum", page.to_string()),
        ];

        debug!(search_val, page, "searching locations");
        let response: SearchResponse = self.get_json(&url, &query).await?;
        Ok(response.results)
    }

    /// Authenticated GET decoding a JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, OneMapError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| OneMapError::Closed)?;

        let token = self.tokens.get().await?;

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .query(query)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Revoked early; make the next request fetch a new one
            self.tokens.invalidate().await;
            return Err(OneMapError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OneMapError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| OneMapError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
