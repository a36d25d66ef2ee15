//! Checkpoint planning along a route.
//!
//! A checkpoint is a target cumulative distance at which a parking lookup
//! is attempted. Checkpoints are spaced by the distance covered in one stop
//! interval at the configured cycling speed, and the route's endpoint is
//! always the final checkpoint.

use crate::domain::IntervalMins;

/// Distance covered in one interval at the given speed, in meters.
///
/// # Examples
///
/// ```
/// use pitstop_server::domain::IntervalMins;
/// use pitstop_server::planner::checkpoints::step_distance_m;
///
/// assert_eq!(step_distance_m(IntervalMins::new(30).unwrap(), 250), 7500.0);
/// ```
pub fn step_distance_m(interval: IntervalMins, speed_m_per_min: u32) -> f64 {
    (u64::from(interval.get()) * u64::from(speed_m_per_min)) as f64
}

/// Plan the checkpoint distances for a route of `total_distance_m`.
///
/// Checkpoints are `step, 2·step, …` up to and including the last multiple
/// not exceeding the total, followed by the total itself when that last
/// multiple falls short of it.
///
/// A route shorter than one step still gets exactly one checkpoint at
/// `step`, beyond the end of the route. Nearest-index matching clamps it to
/// the final coordinate.
///
/// Non-positive or non-finite totals, and non-positive steps, yield no
/// checkpoints.
///
/// # Examples
///
/// ```
/// use pitstop_server::planner::checkpoints::plan;
///
/// assert_eq!(plan(7500.0, 20000.0), vec![7500.0, 15000.0, 20000.0]);
/// assert_eq!(plan(7500.0, 15000.0), vec![7500.0, 15000.0]);
/// assert_eq!(plan(7500.0, 3000.0), vec![7500.0]);
/// ```
pub fn plan(step_m: f64, total_distance_m: f64) -> Vec<f64> {
    if !(step_m > 0.0) || !(total_distance_m > 0.0) || !total_distance_m.is_finite() {
        return Vec::new();
    }

    let mut checkpoints = Vec::new();
    let mut current = step_m;

    loop {
        checkpoints.push(current);
        current += step_m;
        if current > total_distance_m {
            break;
        }
    }

    if checkpoints
        .last()
        .is_some_and(|&last| last < total_distance_m)
    {
        checkpoints.push(total_distance_m);
    }

    checkpoints
}

/// Index of the profile entry closest to `target`.
///
/// Equivalent to a linear scan for the minimum absolute difference that
/// keeps the earliest index on ties, but runs in `O(log n)` on the
/// non-decreasing profile. Within a plateau of equal values the first index
/// of the plateau is returned.
///
/// Returns `None` for an empty profile.
///
/// # Examples
///
/// ```
/// use pitstop_server::planner::checkpoints::nearest_index;
///
/// let profile = [0.0, 100.0, 100.0, 300.0];
/// assert_eq!(nearest_index(&profile, 120.0), Some(1));
/// assert_eq!(nearest_index(&profile, 200.0), Some(1));
/// assert_eq!(nearest_index(&profile, 250.0), Some(3));
/// assert_eq!(nearest_index(&profile, 9999.0), Some(3));
/// ```
pub fn nearest_index(profile: &[f64], target: f64) -> Option<usize> {
    let last = *profile.last()?;
    let first_at_or_above = profile.partition_point(|&d| d < target);

    if first_at_or_above == 0 {
        return Some(0);
    }
    if first_at_or_above == profile.len() {
        return Some(first_index_of(profile, last));
    }

    let below = profile[first_at_or_above - 1];
    let above = profile[first_at_or_above];

    if target - below <= above - target {
        Some(first_index_of(profile, below))
    } else {
        Some(first_at_or_above)
    }
}

/// First index holding `value` in a non-decreasing profile that contains it.
fn first_index_of(profile: &[f64], value: f64) -> usize {
    profile.partition_point(|&d| d < value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(mins: i64) -> IntervalMins {
        IntervalMins::new(mins).unwrap()
    }

    #[test]
    fn step_is_interval_times_speed() {
        assert_eq!(step_distance_m(interval(30), 250), 7500.0);
        assert_eq!(step_distance_m(interval(60), 250), 15000.0);
        assert_eq!(step_distance_m(interval(1), 250), 250.0);
    }

    #[test]
    fn endpoint_appended_when_not_a_multiple() {
        assert_eq!(plan(7500.0, 20000.0), vec![7500.0, 15000.0, 20000.0]);
    }

    #[test]
    fn exact_multiple_has_no_duplicate_endpoint() {
        assert_eq!(plan(7500.0, 15000.0), vec![7500.0, 15000.0]);
        assert_eq!(plan(7500.0, 7500.0), vec![7500.0]);
    }

    #[test]
    fn short_route_keeps_single_overshooting_checkpoint() {
        assert_eq!(plan(7500.0, 3000.0), vec![7500.0]);
    }

    #[test]
    fn degenerate_totals_have_no_checkpoints() {
        assert!(plan(7500.0, 0.0).is_empty());
        assert!(plan(7500.0, -10.0).is_empty());
        assert!(plan(7500.0, f64::NAN).is_empty());
        assert!(plan(7500.0, f64::INFINITY).is_empty());
        assert!(plan(0.0, 1000.0).is_empty());
    }

    #[test]
    fn fractional_total() {
        assert_eq!(plan(250.0, 600.5), vec![250.0, 500.0, 600.5]);
    }

    #[test]
    fn nearest_index_empty_profile() {
        assert_eq!(nearest_index(&[], 10.0), None);
    }

    #[test]
    fn nearest_index_single_point_clamps() {
        assert_eq!(nearest_index(&[0.0], 7500.0), Some(0));
    }

    #[test]
    fn nearest_index_before_start() {
        assert_eq!(nearest_index(&[0.0, 10.0], -5.0), Some(0));
    }

    #[test]
    fn nearest_index_tie_prefers_earlier() {
        assert_eq!(nearest_index(&[0.0, 100.0, 200.0], 150.0), Some(1));
    }

    #[test]
    fn nearest_index_plateau_returns_first() {
        let profile = [0.0, 0.0, 0.0, 50.0, 50.0, 50.0];
        assert_eq!(nearest_index(&profile, 0.0), Some(0));
        assert_eq!(nearest_index(&profile, 10.0), Some(0));
        assert_eq!(nearest_index(&profile, 40.0), Some(3));
        assert_eq!(nearest_index(&profile, 500.0), Some(3));
    }

    #[test]
    fn overshooting_checkpoint_maps_to_last_coordinate() {
        let profile = [0.0, 400.0, 900.0];
        let checkpoints = plan(7500.0, 900.0);
        assert_eq!(nearest_index(&profile, checkpoints[0]), Some(2));
    }
}
