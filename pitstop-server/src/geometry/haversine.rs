//! Great-circle distances along a path.

use crate::domain::Coordinate;

/// Earth radius used for all distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error computing a distance profile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistanceError {
    /// No coordinates to measure
    #[error("coordinate sequence must not be empty")]
    Empty,

    /// A coordinate has a NaN or infinite component
    #[error("coordinate {index} is not finite: {coordinate}")]
    NonFinite { index: usize, coordinate: Coordinate },
}

/// Great-circle distance between two points in meters, by the haversine formula.
pub fn distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let sin_dlat_half = ((b.lat - a.lat).to_radians() * 0.5).sin();
    let sin_dlon_half = ((b.lon - a.lon).to_radians() * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    // Rounding can push h a hair past 1 for antipodal points
    2.0 * EARTH_RADIUS_M * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Running great-circle distance from the first coordinate to each coordinate.
///
/// The profile has one entry per coordinate, starts at `0` and never
/// decreases. Coincident consecutive points add a zero-length segment.
///
/// # Examples
///
/// ```
/// use pitstop_server::domain::Coordinate;
/// use pitstop_server::geometry::haversine::cumulative_distances;
///
/// let p = Coordinate::from_raw(103.68437, 1.35489);
/// assert_eq!(cumulative_distances(&[p]).unwrap(), vec![0.0]);
/// assert_eq!(cumulative_distances(&[p, p]).unwrap(), vec![0.0, 0.0]);
/// assert!(cumulative_distances(&[]).is_err());
/// ```
pub fn cumulative_distances(coords: &[Coordinate]) -> Result<Vec<f64>, DistanceError> {
    if coords.is_empty() {
        return Err(DistanceError::Empty);
    }
    if let Some((index, &coordinate)) = coords.iter().enumerate().find(|(_, c)| !c.is_finite()) {
        return Err(DistanceError::NonFinite { index, coordinate });
    }

    let mut profile = Vec::with_capacity(coords.len());
    let mut total = 0.0;
    profile.push(total);

    for pair in coords.windows(2) {
        total += distance_m(pair[0], pair[1]);
        profile.push(total);
    }

    Ok(profile)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-180.0..180.0f64, -90.0..90.0f64).prop_map(|(lon, lat)| Coordinate::from_raw(lon, lat))
    }

    proptest! {
        /// Profile has one entry per coordinate and starts at zero
        #[test]
        fn profile_length_matches(coords in prop::collection::vec(coordinate(), 1..50)) {
            let profile = cumulative_distances(&coords).unwrap();
            prop_assert_eq!(profile.len(), coords.len());
            prop_assert_eq!(profile[0], 0.0);
        }

        /// Profile never decreases, even with repeated points
        #[test]
        fn profile_non_decreasing(
            coords in prop::collection::vec(coordinate(), 1..30),
            repeats in prop::collection::vec(0usize..3, 30),
        ) {
            let path: Vec<Coordinate> = coords
                .iter()
                .zip(repeats.iter())
                .flat_map(|(c, &n)| std::iter::repeat_n(*c, n + 1))
                .collect();

            let profile = cumulative_distances(&path).unwrap();
            for pair in profile.windows(2) {
                prop_assert!(pair[1] >= pair[0]);
                prop_assert!(!pair[1].is_nan());
            }
        }

        /// Distance is symmetric and non-negative
        #[test]
        fn distance_symmetric(a in coordinate(), b in coordinate()) {
            let ab = distance_m(a, b);
            let ba = distance_m(b, a);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() < 1e-6);
        }
    }
}
