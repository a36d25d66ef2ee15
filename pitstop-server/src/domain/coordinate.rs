//! Geographic coordinate type.

use std::fmt;

use serde::Serialize;

/// Error returned when a coordinate cannot be constructed or parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: String,
}

impl InvalidCoordinate {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A WGS-84 position in degrees, stored in `(longitude, latitude)` order.
///
/// Coordinates built through [`Coordinate::new`] always have finite
/// components. Values decoded from route geometry go through
/// [`Coordinate::from_raw`] and are checked later by the distance profile.
///
/// # Examples
///
/// ```
/// use pitstop_server::domain::Coordinate;
///
/// let c = Coordinate::parse_lat_lon("1.35489,103.68437").unwrap();
/// assert_eq!(c.lon, 103.68437);
/// assert_eq!(c.lat, 1.35489);
///
/// assert!(Coordinate::new(f64::NAN, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite components.
    pub fn new(lon: f64, lat: f64) -> Result<Self, InvalidCoordinate> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(InvalidCoordinate::new("components must be finite numbers"));
        }
        Ok(Self { lon, lat })
    }

    /// Create a coordinate without validation.
    pub fn from_raw(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Parse the routing provider's `"lat,lon"` form.
    pub fn parse_lat_lon(s: &str) -> Result<Self, InvalidCoordinate> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| InvalidCoordinate::new(format!("expected \"lat,lon\", got {s:?}")))?;

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| InvalidCoordinate::new(format!("latitude is not a number: {lat:?}")))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| InvalidCoordinate::new(format!("longitude is not a number: {lon:?}")))?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate::new(format!("latitude out of range: {lat}")));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate::new(format!("longitude out of range: {lon}")));
        }

        Self::new(lon, lat)
    }

    /// Whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Render in the routing provider's `"lat,lon"` form.
    pub fn to_lat_lon(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 1.0).is_err());
        assert!(Coordinate::new(103.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(103.0, 1.3).is_ok());
    }

    #[test]
    fn parse_lat_lon_orders_components() {
        let c = Coordinate::parse_lat_lon("1.3, 103.8").unwrap();
        assert_eq!(c, Coordinate::from_raw(103.8, 1.3));
    }

    #[test]
    fn parse_lat_lon_rejects_garbage() {
        assert!(Coordinate::parse_lat_lon("").is_err());
        assert!(Coordinate::parse_lat_lon("1.3").is_err());
        assert!(Coordinate::parse_lat_lon("north,east").is_err());
        assert!(Coordinate::parse_lat_lon("91.0,103.8").is_err());
        assert!(Coordinate::parse_lat_lon("1.3,181.0").is_err());
    }

    #[test]
    fn lat_lon_roundtrip() {
        let c = Coordinate::from_raw(103.8, 1.3);
        assert_eq!(Coordinate::parse_lat_lon(&c.to_lat_lon()).unwrap(), c);
    }

    #[test]
    fn display() {
        let c = Coordinate::from_raw(103.8, 1.3);
        assert_eq!(c.to_string(), "(103.8, 1.3)");
    }
}
