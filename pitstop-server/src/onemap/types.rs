//! OneMap API response DTOs.
//!
//! OneMap omits fields freely and is loose about numeric types, so nearly
//! everything here is optional or defaulted.

use serde::Deserialize;
use serde_json::Value;

/// Response from the routing service.
///
/// The primary route's fields sit at the top level; alternates, when the
/// provider offers any, are listed under `alternativeroute`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteResponse {
    #[serde(flatten)]
    pub primary: RouteDto,

    #[serde(default, rename = "alternativeroute")]
    pub alternatives: Vec<RouteDto>,
}

/// One route as returned by the routing service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteDto {
    /// Encoded polyline.
    #[serde(default)]
    pub route_geometry: Option<String>,

    /// Instruction entries. Each is normally an array of mixed values whose
    /// last element is the full human-readable instruction.
    #[serde(default)]
    pub route_instructions: Vec<Value>,

    #[serde(default)]
    pub route_summary: Option<RouteSummaryDto>,
}

/// Totals block of a route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteSummaryDto {
    pub start_point: Option<String>,
    pub end_point: Option<String>,
    /// Seconds.
    pub total_time: Option<f64>,
    /// Meters.
    pub total_distance: Option<f64>,
}

/// Response from the elastic search endpoint.
///
/// Only the result list is kept; paging metadata is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Value>,
}

/// Request body for the token endpoint.
#[derive(Debug, serde::Serialize)]
pub struct TokenRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Unix seconds, sent as either a string or a number.
    pub expiry_timestamp: Value,
}

impl TokenResponse {
    /// Expiry as Unix seconds, if the field holds a whole number.
    pub fn expiry_secs(&self) -> Option<i64> {
        match &self.expiry_timestamp {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_response_with_alternatives() {
        let json = r#"{
            "status": 0,
            "route_geometry": "_p~iF~ps|U",
            "route_instructions": [["Head", "JALAN BAHAR", 56, "1.35,103.68", 10, "56m", "North", "north", "cycling", "Head North On Jalan Bahar"]],
            "route_summary": {"start_point": "JALAN BAHAR", "end_point": "NANYANG AVENUE", "total_time": 1800, "total_distance": 7000},
            "alternativeroute": [
                {"route_geometry": "abc", "route_instructions": [], "route_summary": {"total_time": 1200, "total_distance": 6500.5}}
            ]
        }"#;

        let response: RouteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.primary.route_geometry.as_deref(), Some("_p~iF~ps|U"));
        assert_eq!(response.primary.route_instructions.len(), 1);
        let summary = response.primary.route_summary.unwrap();
        assert_eq!(summary.start_point.as_deref(), Some("JALAN BAHAR"));
        assert_eq!(summary.total_time, Some(1800.0));

        assert_eq!(response.alternatives.len(), 1);
        let alt = response.alternatives[0].route_summary.as_ref().unwrap();
        assert_eq!(alt.start_point, None);
        assert_eq!(alt.total_distance, Some(6500.5));
    }

    #[test]
    fn empty_route_response() {
        let response: RouteResponse = serde_json::from_str("{}").unwrap();
        assert!(response.primary.route_geometry.is_none());
        assert!(response.alternatives.is_empty());
    }

    #[test]
    fn token_expiry_forms() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "t", "expiry_timestamp": "1700000000"}"#)
                .unwrap();
        assert_eq!(token.expiry_secs(), Some(1_700_000_000));

        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "t", "expiry_timestamp": 1700000000}"#)
                .unwrap();
        assert_eq!(token.expiry_secs(), Some(1_700_000_000));

        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "t", "expiry_timestamp": "soon"}"#).unwrap();
        assert_eq!(token.expiry_secs(), None);
    }

    #[test]
    fn search_results_kept_raw() {
        let json = r#"{"found": 1, "totalNumPages": 1, "pageNum": 1,
            "results": [{"SEARCHVAL": "NTU", "LATITUDE": "1.348", "LONGITUDE": "103.683"}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0]["SEARCHVAL"], "NTU");
    }

    #[test]
    fn search_without_results_is_empty() {
        let response: SearchResponse = serde_json::from_str(r#"{"found": 0}"#).unwrap();
        assert!(response.results.is_empty());
    }
}
