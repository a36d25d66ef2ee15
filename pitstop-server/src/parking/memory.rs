//! In-memory parking store.
//!
//! Answers nearest-spot lookups by scanning a fixed list with haversine
//! distances. Useful for development without a database, and for tests.

use crate::domain::{Coordinate, ParkingSpot, UNKNOWN};
use crate::geometry::distance_m;
use crate::planner::{SpatialError, SpatialOracle};

use super::ingest::ParkingRecord;

/// Parking store over a fixed list of spots.
#[derive(Debug, Clone, Default)]
pub struct InMemoryParkingStore {
    spots: Vec<ParkingSpot>,
}

impl InMemoryParkingStore {
    /// Create a store from spots. Their `deviation_m` is ignored.
    pub fn new(spots: Vec<ParkingSpot>) -> Self {
        Self { spots }
    }

    /// Create a store from feed records, numbering them from 1.
    ///
    /// Records with non-finite coordinates are dropped.
    pub fn from_records(records: &[ParkingRecord]) -> Self {
        let spots = records
            .iter()
            .filter_map(|r| {
                let coordinate = Coordinate::new(r.longitude, r.latitude).ok()?;
                Some((coordinate, r))
            })
            .zip(1..)
            .map(|((coordinate, r), id)| ParkingSpot {
                id,
                description: r.description.clone(),
                coordinate,
                rack_type: r.rack_type.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                rack_count: r.rack_count.unwrap_or(0),
                shelter_indicator: r.is_sheltered(),
                deviation_m: 0.0,
            })
            .collect();

        Self { spots }
    }

    /// Number of spots in the store.
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    /// Whether the store has no spots.
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}

impl SpatialOracle for InMemoryParkingStore {
    async fn nearest(
        &self,
        coordinate: Coordinate,
        radius_m: f64,
    ) -> Result<Option<ParkingSpot>, SpatialError> {
        let mut best: Option<(&ParkingSpot, f64)> = None;

        for spot in &self.spots {
            let deviation = distance_m(coordinate, spot.coordinate);
            if deviation > radius_m {
                continue;
            }
            // Strict comparison keeps the earliest spot on ties
            if best.is_none_or(|(_, d)| deviation < d) {
                best = Some((spot, deviation));
            }
        }

        Ok(best.map(|(spot, deviation)| ParkingSpot {
            deviation_m: deviation,
            ..spot.clone()
        }))
    }
}
