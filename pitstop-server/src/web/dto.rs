//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{AnnotatedRoute, ParkingSpot, RouteSummary};

/// Query for `GET /api/v1/search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Free-text search
    #[serde(rename = "searchVal")]
    pub search_val: String,

    /// Result page, from 1
    #[serde(rename = "pageNum", default = "first_page")]
    pub page_num: u32,
}

fn first_page() -> u32 {
    1
}

/// Query for `GET /api/v1/routes`.
#[derive(Debug, Deserialize)]
pub struct RoutesRequest {
    /// Start as `"lat,lon"`
    pub start: String,

    /// End as `"lat,lon"`
    pub end: String,

    /// Minutes between stops (defaults to 30)
    #[serde(rename = "intervalMins")]
    pub interval_mins: Option<i64>,
}

/// Body of the health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

/// A route with its parking spots.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    /// Encoded polyline
    pub route_geometry: String,

    /// Top-level instructions in travel order
    pub route_instructions: Vec<String>,

    pub route_summary: RouteSummaryResult,

    /// One entry per checkpoint that found a spot
    pub parking_spots: Vec<ParkingSpotResult>,
}

#[derive(Debug, Serialize)]
pub struct RouteSummaryResult {
    pub start_point: String,
    pub end_point: String,
    pub total_time_s: u64,
    pub total_distance_m: f64,
}

#[derive(Debug, Serialize)]
pub struct ParkingSpotResult {
    pub id: i32,
    pub description: String,
    pub coordinates: CoordinatesResult,
    pub rack_type: String,
    pub rack_count: u32,
    pub shelter_indicator: bool,
    pub deviation_m: f64,
}

#[derive(Debug, Serialize)]
pub struct CoordinatesResult {
    pub lat: f64,
    pub lon: f64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&RouteSummary> for RouteSummaryResult {
    fn from(summary: &RouteSummary) -> Self {
        Self {
            start_point: summary.start_point.clone(),
            end_point: summary.end_point.clone(),
            total_time_s: summary.total_time_s,
            total_distance_m: summary.total_distance_m,
        }
    }
}

impl From<&ParkingSpot> for ParkingSpotResult {
    fn from(spot: &ParkingSpot) -> Self {
        Self {
            id: spot.id,
            description: spot.description.clone(),
            coordinates: CoordinatesResult {
                lat: spot.coordinate.lat,
                lon: spot.coordinate.lon,
            },
            rack_type: spot.rack_type.clone(),
            rack_count: spot.rack_count,
            shelter_indicator: spot.shelter_indicator,
            deviation_m: spot.deviation_m,
        }
    }
}

impl From<&AnnotatedRoute> for RouteResult {
    fn from(annotated: &AnnotatedRoute) -> Self {
        let route = &annotated.route;
        Self {
            route_geometry: route.geometry.clone(),
            route_instructions: route.instructions.clone(),
            route_summary: RouteSummaryResult::from(&route.summary),
            parking_spots: annotated
                .parking_spots
                .iter()
                .map(ParkingSpotResult::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Route};
    use serde_json::json;

    #[test]
    fn route_result_shape() {
        let annotated = AnnotatedRoute::new(
            Route {
                geometry: "_p~iF~ps|U".to_string(),
                summary: RouteSummary {
                    start_point: "JALAN BAHAR".to_string(),
                    end_point: "NANYANG AVENUE".to_string(),
                    total_time_s: 600,
                    total_distance_m: 2500.0,
                },
                instructions: vec!["Head North On Jalan Bahar".to_string()],
            },
            vec![ParkingSpot {
                id: 3,
                description: "BLK 1".to_string(),
                coordinate: Coordinate::from_raw(103.68, 1.35),
                rack_type: "Yellow Box".to_string(),
                rack_count: 8,
                shelter_indicator: true,
                deviation_m: 12.5,
            }],
        );

        let value = serde_json::to_value(RouteResult::from(&annotated)).unwrap();
        assert_eq!(
            value,
            json!({
                "route_geometry": "_p~iF~ps|U",
                "route_instructions": ["Head North On Jalan Bahar"],
                "route_summary": {
                    "start_point": "JALAN BAHAR",
                    "end_point": "NANYANG AVENUE",
                    "total_time_s": 600,
                    "total_distance_m": 2500.0
                },
                "parking_spots": [{
                    "id": 3,
                    "description": "BLK 1",
                    "coordinates": {"lat": 1.35, "lon": 103.68},
                    "rack_type": "Yellow Box",
                    "rack_count": 8,
                    "shelter_indicator": true,
                    "deviation_m": 12.5
                }]
            })
        );
    }

    #[test]
    fn search_request_defaults_page() {
        let req: SearchRequest = serde_json::from_value(json!({"searchVal": "ntu"})).unwrap();
        assert_eq!(req.search_val, "ntu");
        assert_eq!(req.page_num, 1);
    }
}
