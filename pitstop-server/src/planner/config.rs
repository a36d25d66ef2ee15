//! Planner configuration.

/// Configuration parameters for checkpoint planning and facility lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Assumed average cycling speed in meters per minute.
    /// 250 m/min is 15 km/h.
    pub speed_m_per_min: u32,

    /// First search radius around each checkpoint (meters).
    pub search_radius_m: f64,

    /// Radius used once when nothing is found within `search_radius_m`.
    pub expanded_search_radius_m: f64,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(speed_m_per_min: u32, search_radius_m: f64, expanded_search_radius_m: f64) -> Self {
        Self {
            speed_m_per_min,
            search_radius_m,
            expanded_search_radius_m,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            speed_m_per_min: 250,
            search_radius_m: 500.0,
            expanded_search_radius_m: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.speed_m_per_min, 250);
        assert_eq!(config.search_radius_m, 500.0);
        assert_eq!(config.expanded_search_radius_m, 1000.0);
    }

    #[test]
    fn custom_config() {
        let config = PlannerConfig::new(300, 200.0, 400.0);

        assert_eq!(config.speed_m_per_min, 300);
        assert_eq!(config.search_radius_m, 200.0);
        assert_eq!(config.expanded_search_radius_m, 400.0);
    }
}
