//! Route geometry: polyline decoding and great-circle distances.

pub mod haversine;
pub mod polyline;

pub use haversine::{DistanceError, cumulative_distances, distance_m};
pub use polyline::PolylineError;
