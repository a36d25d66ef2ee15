//! Route ranking for annotated results.

use crate::domain::AnnotatedRoute;

/// Rank routes by total travel time, fastest first.
///
/// Uses a stable sort, so routes with equal travel time keep their input
/// order (primary before alternates, alternates in provider order).
pub fn rank_routes(mut routes: Vec<AnnotatedRoute>) -> Vec<AnnotatedRoute> {
    // `sort_by_key` is guaranteed stable
    routes.sort_by_key(AnnotatedRoute::total_time_s);
    routes
}
