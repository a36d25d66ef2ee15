//! Bicycle parking facility types.

use super::coordinate::Coordinate;

/// Error returned when a facility location cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unparseable spot location {text:?}: {reason}")]
pub struct SpotParseError {
    text: String,
    reason: &'static str,
}

impl SpotParseError {
    fn new(text: &str, reason: &'static str) -> Self {
        Self {
            text: text.to_string(),
            reason,
        }
    }
}

/// A bicycle parking facility resolved for one checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSpot {
    /// Store identifier.
    pub id: i32,

    /// Free-text description, unique across the catalogue.
    pub description: String,

    /// Location of the facility (not the checkpoint it was found from).
    pub coordinate: Coordinate,

    /// Rack type, e.g. "Yellow Box".
    pub rack_type: String,

    /// Number of racks.
    pub rack_count: u32,

    /// Whether the racks are sheltered.
    pub shelter_indicator: bool,

    /// Distance in meters from the query coordinate, as reported by the store.
    pub deviation_m: f64,
}

/// Parse a well-known-text point such as `POINT(103.8 1.35)`.
///
/// The point is read in `(longitude, latitude)` order.
///
/// # Examples
///
/// ```
/// use pitstop_server::domain::parse_point_wkt;
///
/// let c = parse_point_wkt("POINT(103.68437 1.35489)").unwrap();
/// assert_eq!((c.lon, c.lat), (103.68437, 1.35489));
///
/// assert!(parse_point_wkt("LINESTRING(0 0, 1 1)").is_err());
/// ```
pub fn parse_point_wkt(text: &str) -> Result<Coordinate, SpotParseError> {
    let body = text
        .trim()
        .strip_prefix("POINT")
        .ok_or_else(|| SpotParseError::new(text, "not a POINT"))?
        .trim_start()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| SpotParseError::new(text, "missing parentheses"))?;

    let mut parts = body.split_whitespace();
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(SpotParseError::new(text, "expected exactly two components"));
    };

    let lon: f64 = lon
        .parse()
        .map_err(|_| SpotParseError::new(text, "longitude is not a number"))?;
    let lat: f64 = lat
        .parse()
        .map_err(|_| SpotParseError::new(text, "latitude is not a number"))?;

    Coordinate::new(lon, lat).map_err(|_| SpotParseError::new(text, "components must be finite"))
}
