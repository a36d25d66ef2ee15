//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedOneMapClient;
use crate::parking::PgParkingStore;
use crate::planner::PlannerConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests. Generic over the
/// route provider `P` and parking store `O`; the server runs with the cached
/// OneMap client and either store.
pub struct AppState<P = CachedOneMapClient, O = PgParkingStore> {
    /// Route and search provider
    pub onemap: Arc<P>,

    /// Parking spot store
    pub parking: Arc<O>,

    /// Route annotation settings
    pub planner: Arc<PlannerConfig>,
}

impl<P, O> AppState<P, O> {
    /// Create a new app state.
    pub fn new(onemap: P, parking: O, planner: PlannerConfig) -> Self {
        Self {
            onemap: Arc::new(onemap),
            parking: Arc::new(parking),
            planner: Arc::new(planner),
        }
    }
}

// Manual impl: only the `Arc`s are cloned, so `P` and `O` need not be `Clone`
impl<P, O> Clone for AppState<P, O> {
    fn clone(&self) -> Self {
        Self {
            onemap: Arc::clone(&self.onemap),
            parking: Arc::clone(&self.parking),
            planner: Arc::clone(&self.planner),
        }
    }
}
