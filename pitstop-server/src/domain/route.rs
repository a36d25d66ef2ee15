//! Cycling route types.

use super::parking::ParkingSpot;

/// Placeholder for text fields the routing provider or parking feed left empty.
pub const UNKNOWN: &str = "N/A";

/// Totals and endpoints of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    /// Human-readable start label.
    pub start_point: String,

    /// Human-readable end label.
    pub end_point: String,

    /// Total travel time in seconds.
    pub total_time_s: u64,

    /// Total route length in meters.
    pub total_distance_m: f64,
}

impl Default for RouteSummary {
    fn default() -> Self {
        Self {
            start_point: UNKNOWN.to_string(),
            end_point: UNKNOWN.to_string(),
            total_time_s: 0,
            total_distance_m: 0.0,
        }
    }
}

/// A candidate route as supplied by the routing provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    /// Encoded polyline of the path.
    pub geometry: String,

    /// Route totals.
    pub summary: RouteSummary,

    /// Top-level turn-by-turn descriptions, in travel order.
    pub instructions: Vec<String>,
}

impl Route {
    /// A route is degenerate if it has no geometry or no positive length.
    ///
    /// Degenerate routes are still reported, just without any facilities.
    pub fn is_degenerate(&self) -> bool {
        self.geometry.is_empty() || !(self.summary.total_distance_m > 0.0)
    }
}

/// A route together with the parking spots found along it.
///
/// `parking_spots` holds at most one entry per checkpoint; checkpoints
/// without a facility in range contribute nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRoute {
    pub route: Route,
    pub parking_spots: Vec<ParkingSpot>,
}

impl AnnotatedRoute {
    pub fn new(route: Route, parking_spots: Vec<ParkingSpot>) -> Self {
        Self {
            route,
            parking_spots,
        }
    }

    /// Total travel time in seconds, the key routes are ranked by.
    pub fn total_time_s(&self) -> u64 {
        self.route.summary.total_time_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(geometry: &str, distance: f64) -> Route {
        Route {
            geometry: geometry.to_string(),
            summary: RouteSummary {
                total_distance_m: distance,
                ..RouteSummary::default()
            },
            instructions: Vec::new(),
        }
    }

    #[test]
    fn summary_defaults_to_placeholders() {
        let summary = RouteSummary::default();
        assert_eq!(summary.start_point, "N/A");
        assert_eq!(summary.end_point, "N/A");
        assert_eq!(summary.total_time_s, 0);
        assert_eq!(summary.total_distance_m, 0.0);
    }

    #[test]
    fn degenerate_routes() {
        assert!(route("", 1000.0).is_degenerate());
        assert!(route("_p~iF~ps|U", 0.0).is_degenerate());
        assert!(route("_p~iF~ps|U", -5.0).is_degenerate());
        assert!(route("_p~iF~ps|U", f64::NAN).is_degenerate());
        assert!(!route("_p~iF~ps|U", 1000.0).is_degenerate());
    }
}
