//! Caching layer for OneMap responses.
//!
//! Route and search answers change rarely, and riders tend to repeat the
//! same queries while adjusting their stop interval, so both are cached for
//! a few minutes. Parking annotation is not cached: it depends on the
//! interval and is cheap next to the provider round trip.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde_json::Value;

use crate::domain::Coordinate;
use crate::onemap::{OneMapClient, OneMapError, RouteProvider, RouteResponse};

/// Cache key for routes: (start, end) in `"lat,lon"` form.
type RouteKey = (String, String);

/// Cache key for searches: (search text, page number).
type SearchKey = (String, u32);

/// Cached search result list.
type SearchEntry = Arc<Vec<Value>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Cache for OneMap responses.
pub struct OneMapCache {
    routes: MokaCache<RouteKey, Arc<RouteResponse>>,
    searches: MokaCache<SearchKey, SearchEntry>,
}

impl OneMapCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes, searches }
    }

    fn route_key(start: Coordinate, end: Coordinate) -> RouteKey {
        (start.to_lat_lon(), end.to_lat_lon())
    }

    /// Get a cached route response.
    pub async fn get_route(&self, start: Coordinate, end: Coordinate) -> Option<Arc<RouteResponse>> {
        self.routes.get(&Self::route_key(start, end)).await
    }

    /// Insert a route response into the cache.
    pub async fn insert_route(&self, start: Coordinate, end: Coordinate, entry: Arc<RouteResponse>) {
        self.routes.insert(Self::route_key(start, end), entry).await;
    }

    /// Get cached search results.
    pub async fn get_search(&self, search_val: &str, page: u32) -> Option<SearchEntry> {
        self.searches.get(&(search_val.to_string(), page)).await
    }

    /// Insert search results into the cache.
    pub async fn insert_search(&self, search_val: &str, page: u32, entry: SearchEntry) {
        self.searches
            .insert((search_val.to_string(), page), entry)
            .await;
    }
}

/// OneMap client with caching.
///
/// Wraps a `OneMapClient` and caches route and search responses. Errors are
/// never cached.
pub struct CachedOneMapClient {
    client: OneMapClient,
    cache: OneMapCache,
}

impl CachedOneMapClient {
    /// Create a new cached client.
    pub fn new(client: OneMapClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: OneMapCache::new(cache_config),
        }
    }
}

impl RouteProvider for CachedOneMapClient {
    /// Get cycling routes, using cache if available.
    async fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Arc<RouteResponse>, OneMapError> {
        if let Some(cached) = self.cache.get_route(start, end).await {
            return Ok(cached);
        }

        let entry = Arc::new(self.client.route(start, end).await?);
        self.cache.insert_route(start, end, entry.clone()).await;

        Ok(entry)
    }

    /// Search locations, using cache if available.
    async fn search(&self, search_val: &str, page: u32) -> Result<SearchEntry, OneMapError> {
        if let Some(cached) = self.cache.get_search(search_val, page).await {
            return Ok(cached);
        }

        let entry = Arc::new(self.client.search(search_val, page).await?);
        self.cache
            .insert_search(search_val, page, entry.clone())
            .await;

        Ok(entry)
    }
}
