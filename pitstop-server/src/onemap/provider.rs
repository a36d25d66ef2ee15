//! Route and search lookups as used by the HTTP handlers.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::Coordinate;

use super::error::OneMapError;
use super::types::RouteResponse;

/// Source of cycling routes and location search results.
///
/// Answers are shared so a caching implementation can hand out the same
/// response to every caller.
pub trait RouteProvider: Send + Sync {
    /// Primary and alternate cycling routes from `start` to `end`.
    fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> impl Future<Output = Result<Arc<RouteResponse>, OneMapError>> + Send;

    /// One page of raw search results, passed through untouched.
    fn search(
        &self,
        search_val: &str,
        page: u32,
    ) -> impl Future<Output = Result<Arc<Vec<Value>>, OneMapError>> + Send;
}
