//! Conversion from OneMap DTOs to domain routes.

use serde_json::Value;

use crate::domain::{Route, RouteSummary, UNKNOWN};

use super::types::{RouteDto, RouteResponse, RouteSummaryDto};

/// Convert a routing response into the primary route and its alternates.
pub fn convert_route_response(response: &RouteResponse) -> (Route, Vec<Route>) {
    let primary = convert_route(&response.primary);
    let alternates = response.alternatives.iter().map(convert_route).collect();
    (primary, alternates)
}

/// Convert a single route DTO.
pub fn convert_route(dto: &RouteDto) -> Route {
    Route {
        geometry: dto.route_geometry.clone().unwrap_or_default(),
        summary: dto
            .route_summary
            .as_ref()
            .map(convert_summary)
            .unwrap_or_default(),
        instructions: dto
            .route_instructions
            .iter()
            .filter_map(top_level_instruction)
            .collect(),
    }
}

fn convert_summary(dto: &RouteSummaryDto) -> RouteSummary {
    RouteSummary {
        start_point: dto
            .start_point
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        end_point: dto
            .end_point
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        // Float-to-int casts saturate, so negatives and NaN land on 0
        total_time_s: dto.total_time.map(|t| t.round() as u64).unwrap_or(0),
        total_distance_m: dto
            .total_distance
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(0.0),
    }
}

/// The last element of an instruction entry, as text.
///
/// Entries that are not arrays are taken whole; empty arrays are dropped.
fn top_level_instruction(entry: &Value) -> Option<String> {
    let last = match entry {
        Value::Array(parts) => parts.last()?,
        other => other,
    };

    Some(match last {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dto(value: Value) -> RouteDto {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn keeps_last_instruction_element() {
        let route = convert_route(&dto(json!({
            "route_geometry": "abc",
            "route_instructions": [
                ["Head", "JALAN BAHAR", 56, "Head North On Jalan Bahar"],
                ["Left", "NANYANG AVENUE", 120, "Turn Left Onto Nanyang Avenue"],
            ],
            "route_summary": {"start_point": "A", "end_point": "B", "total_time": 600, "total_distance": 2500}
        })));

        assert_eq!(
            route.instructions,
            vec!["Head North On Jalan Bahar", "Turn Left Onto Nanyang Avenue"]
        );
        assert_eq!(route.geometry, "abc");
        assert_eq!(route.summary.start_point, "A");
        assert_eq!(route.summary.total_time_s, 600);
        assert_eq!(route.summary.total_distance_m, 2500.0);
    }

    #[test]
    fn non_string_instructions_rendered_as_json() {
        let route = convert_route(&dto(json!({
            "route_instructions": [["Head", 56], "Arrive", [], [["nested"]]]
        })));
        assert_eq!(route.instructions, vec!["56", "Arrive", "[\"nested\"]"]);
    }

    #[test]
    fn missing_fields_default() {
        let route = convert_route(&RouteDto::default());
        assert_eq!(route.geometry, "");
        assert!(route.instructions.is_empty());
        assert_eq!(route.summary.start_point, "N/A");
        assert_eq!(route.summary.end_point, "N/A");
        assert_eq!(route.summary.total_time_s, 0);
        assert_eq!(route.summary.total_distance_m, 0.0);
        assert!(route.is_degenerate());
    }

    #[test]
    fn negative_totals_clamp_to_zero() {
        let route = convert_route(&dto(json!({
            "route_summary": {"total_time": -5, "total_distance": -10.0}
        })));
        assert_eq!(route.summary.total_time_s, 0);
        assert_eq!(route.summary.total_distance_m, 0.0);
    }

    #[test]
    fn primary_then_alternates_in_order() {
        let response: RouteResponse = serde_json::from_value(json!({
            "route_geometry": "p",
            "alternativeroute": [{"route_geometry": "a1"}, {"route_geometry": "a2"}]
        }))
        .unwrap();

        let (primary, alternates) = convert_route_response(&response);
        assert_eq!(primary.geometry, "p");
        let geoms: Vec<_> = alternates.iter().map(|r| r.geometry.as_str()).collect();
        assert_eq!(geoms, vec!["a1", "a2"]);
    }
}
