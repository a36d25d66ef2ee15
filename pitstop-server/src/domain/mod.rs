//! Domain types for the cycling route planner.
//!
//! Every type here is a value object built per request. Validating types
//! (`Coordinate`, `IntervalMins`) enforce their invariants at construction
//! time so the planner can trust them.

mod coordinate;
mod interval;
mod parking;
mod route;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use interval::{IntervalMins, InvalidInterval};
pub use parking::{ParkingSpot, SpotParseError, parse_point_wkt};
pub use route::{AnnotatedRoute, Route, RouteSummary, UNKNOWN};
