//! Route annotation with parking spots.
//!
//! For every candidate route: decode the geometry, build the cumulative
//! distance profile, plan checkpoints from the stop interval, map each
//! checkpoint to its nearest coordinate and resolve that coordinate to a
//! parking spot. Routes are annotated concurrently and ranked by travel
//! time afterwards.

use std::iter;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{AnnotatedRoute, IntervalMins, ParkingSpot, Route};
use crate::geometry::{DistanceError, PolylineError, cumulative_distances, polyline};

use super::checkpoints::{nearest_index, plan, step_distance_m};
use super::config::PlannerConfig;
use super::rank::rank_routes;
use super::resolver::{NearestFacilityResolver, SpatialError, SpatialOracle};

/// Error from annotating a route.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnnotateError {
    /// Route geometry could not be decoded
    #[error("malformed route geometry: {0}")]
    MalformedGeometry(#[from] PolylineError),

    /// Decoded geometry is unusable for distance computation
    #[error("invalid route geometry: {0}")]
    InvalidInput(#[from] DistanceError),

    /// The spatial store failed
    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

/// Annotates routes with the parking spots reachable at each stop interval.
pub struct RouteAnnotator<'a, O> {
    oracle: &'a O,
    config: &'a PlannerConfig,
}

impl<'a, O: SpatialOracle> RouteAnnotator<'a, O> {
    pub fn new(oracle: &'a O, config: &'a PlannerConfig) -> Self {
        Self { oracle, config }
    }

    /// Find the parking spots along one route.
    ///
    /// Degenerate routes (empty geometry or non-positive length) have no
    /// spots. A checkpoint with no spot in range, or whose spot could not be
    /// parsed, is left out. Store outages abort the route.
    pub async fn parking_along(
        &self,
        route: &Route,
        interval: IntervalMins,
    ) -> Result<Vec<ParkingSpot>, AnnotateError> {
        if route.is_degenerate() {
            return Ok(Vec::new());
        }

        let coords = polyline::decode(&route.geometry)?;
        let profile = cumulative_distances(&coords)?;

        let step = step_distance_m(interval, self.config.speed_m_per_min);
        let checkpoints = plan(step, route.summary.total_distance_m);
        let resolver = NearestFacilityResolver::new(self.oracle, self.config);

        debug!(
            points = coords.len(),
            checkpoints = checkpoints.len(),
            total_distance_m = route.summary.total_distance_m,
            "annotating route"
        );

        let mut spots = Vec::with_capacity(checkpoints.len());
        for checkpoint in checkpoints {
            let Some(index) = nearest_index(&profile, checkpoint) else {
                continue;
            };
            let coordinate = coords[index];

            match resolver.resolve(coordinate).await {
                Ok(Some(spot)) => spots.push(spot),
                Ok(None) => {
                    debug!(checkpoint, %coordinate, "no parking spot in range");
                }
                Err(SpatialError::SpotParse(e)) => {
                    warn!(checkpoint, %coordinate, error = %e, "skipping checkpoint");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(spots)
    }

    /// Annotate one route.
    ///
    /// A route whose geometry cannot be decoded is kept with no spots so
    /// that one bad candidate does not sink the others.
    pub async fn annotate(
        &self,
        route: Route,
        interval: IntervalMins,
    ) -> Result<AnnotatedRoute, AnnotateError> {
        let result = self.parking_along(&route, interval).await;
        match result {
            Ok(spots) => Ok(AnnotatedRoute::new(route, spots)),
            Err(e @ (AnnotateError::MalformedGeometry(_) | AnnotateError::InvalidInput(_))) => {
                warn!(
                    start = %route.summary.start_point,
                    end = %route.summary.end_point,
                    error = %e,
                    "route kept without parking spots"
                );
                Ok(AnnotatedRoute::new(route, Vec::new()))
            }
            Err(e) => Err(e),
        }
    }

    /// Annotate the primary route and its alternates, fastest first.
    ///
    /// Routes are annotated concurrently; the spatial store's connection
    /// pool bounds how many lookups actually run at once.
    pub async fn annotate_all(
        &self,
        primary: Route,
        alternates: Vec<Route>,
        interval: IntervalMins,
    ) -> Result<Vec<AnnotatedRoute>, AnnotateError> {
        let routes = iter::once(primary).chain(alternates);
        let results = join_all(routes.map(|route| self.annotate(route, interval))).await;

        let annotated = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(rank_routes(annotated))
    }
}
