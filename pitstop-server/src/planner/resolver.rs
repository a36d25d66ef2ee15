//! Nearest parking spot resolution.
//!
//! Each checkpoint coordinate is looked up in the spatial store with a
//! two-tier radius: the default radius first, then one wider search if
//! nothing was found. Finding nothing in either radius is a normal outcome.

use std::future::Future;

use tracing::trace;

use crate::domain::{Coordinate, ParkingSpot, SpotParseError};

use super::config::PlannerConfig;

/// Error from a spatial store lookup.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SpatialError {
    /// The store returned a spot whose location could not be parsed
    #[error("spatial store returned an unparseable spot: {0}")]
    SpotParse(#[from] SpotParseError),

    /// The store could not be queried
    #[error("spatial store unavailable: {message}")]
    Unavailable { message: String },
}

/// Nearest-neighbour lookup over the parking catalogue.
///
/// Implementations return the single closest spot within `radius_m` meters
/// of `coordinate`, with `deviation_m` already filled in, or `None` when the
/// radius is empty. Lookups are read-only and may run concurrently.
pub trait SpatialOracle: Send + Sync {
    fn nearest(
        &self,
        coordinate: Coordinate,
        radius_m: f64,
    ) -> impl Future<Output = Result<Option<ParkingSpot>, SpatialError>> + Send;
}

/// Resolves a coordinate to its nearest parking spot.
pub struct NearestFacilityResolver<'a, O> {
    oracle: &'a O,
    config: &'a PlannerConfig,
}

impl<'a, O: SpatialOracle> NearestFacilityResolver<'a, O> {
    pub fn new(oracle: &'a O, config: &'a PlannerConfig) -> Self {
        Self { oracle, config }
    }

    /// Find the nearest spot within the default radius, widening once on a miss.
    pub async fn resolve(&self, coordinate: Coordinate) -> Result<Option<ParkingSpot>, SpatialError> {
        if let Some(spot) = self
            .oracle
            .nearest(coordinate, self.config.search_radius_m)
            .await?
        {
            return Ok(Some(spot));
        }

        trace!(
            %coordinate,
            radius_m = self.config.expanded_search_radius_m,
            "nothing in default radius, widening search"
        );

        self.oracle
            .nearest(coordinate, self.config.expanded_search_radius_m)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Oracle with one spot that shows up from a fixed radius; records every radius queried.
    struct ScriptedOracle {
        /// Smallest radius at which the spot becomes visible.
        visible_from_m: Option<f64>,
        fail: bool,
        radii: Mutex<Vec<f64>>,
    }

    impl ScriptedOracle {
        fn new(visible_from_m: Option<f64>) -> Self {
            Self {
                visible_from_m,
                fail: false,
                radii: Mutex::new(Vec::new()),
            }
        }

        fn radii(&self) -> Vec<f64> {
            self.radii.lock().unwrap().clone()
        }
    }

    fn spot(deviation_m: f64) -> ParkingSpot {
        ParkingSpot {
            id: 1,
            description: "BUS STOP 12345".to_string(),
            coordinate: Coordinate::from_raw(103.8, 1.3),
            rack_type: "Yellow Box".to_string(),
            rack_count: 10,
            shelter_indicator: true,
            deviation_m,
        }
    }

    impl SpatialOracle for ScriptedOracle {
        async fn nearest(
            &self,
            _coordinate: Coordinate,
            radius_m: f64,
        ) -> Result<Option<ParkingSpot>, SpatialError> {
            self.radii.lock().unwrap().push(radius_m);
            if self.fail {
                return Err(SpatialError::Unavailable {
                    message: "connection refused".to_string(),
                });
            }
            Ok(self
                .visible_from_m
                .filter(|&d| d <= radius_m)
                .map(spot))
        }
    }

    fn here() -> Coordinate {
        Coordinate::from_raw(103.8, 1.3)
    }

    #[tokio::test]
    async fn found_in_default_radius() {
        let oracle = ScriptedOracle::new(Some(120.0));
        let config = PlannerConfig::default();
        let resolver = NearestFacilityResolver::new(&oracle, &config);

        let found = resolver.resolve(here()).await.unwrap();
        assert_eq!(found.map(|s| s.deviation_m), Some(120.0));
        assert_eq!(oracle.radii(), vec![500.0]);
    }

    #[tokio::test]
    async fn widens_once_on_miss() {
        let oracle = ScriptedOracle::new(Some(800.0));
        let config = PlannerConfig::default();
        let resolver = NearestFacilityResolver::new(&oracle, &config);

        let found = resolver.resolve(here()).await.unwrap();
        assert_eq!(found.map(|s| s.deviation_m), Some(800.0));
        assert_eq!(oracle.radii(), vec![500.0, 1000.0]);
    }

    #[tokio::test]
    async fn nothing_within_expanded_radius_is_not_an_error() {
        let oracle = ScriptedOracle::new(Some(1500.0));
        let config = PlannerConfig::default();
        let resolver = NearestFacilityResolver::new(&oracle, &config);

        assert!(resolver.resolve(here()).await.unwrap().is_none());
        assert_eq!(oracle.radii(), vec![500.0, 1000.0]);
    }

    #[tokio::test]
    async fn store_failure_propagates_without_widening() {
        let mut oracle = ScriptedOracle::new(None);
        oracle.fail = true;
        let config = PlannerConfig::default();
        let resolver = NearestFacilityResolver::new(&oracle, &config);

        let err = resolver.resolve(here()).await.unwrap_err();
        assert!(matches!(err, SpatialError::Unavailable { .. }));
        assert_eq!(oracle.radii(), vec![500.0]);
    }

    #[tokio::test]
    async fn uses_configured_radii() {
        let oracle = ScriptedOracle::new(None);
        let config = PlannerConfig::new(250, 100.0, 300.0);
        let resolver = NearestFacilityResolver::new(&oracle, &config);

        assert!(resolver.resolve(here()).await.unwrap().is_none());
        assert_eq!(oracle.radii(), vec![100.0, 300.0]);
    }
}
