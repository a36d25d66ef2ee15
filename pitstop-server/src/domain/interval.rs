//! Stop interval type.

use std::fmt;

/// Error returned when an interval is not a positive whole number of minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("interval must be a positive whole number of minutes, got {0}")]
pub struct InvalidInterval(pub i64);

/// A positive whole number of minutes between planned stops.
///
/// # Examples
///
/// ```
/// use pitstop_server::domain::IntervalMins;
///
/// assert_eq!(IntervalMins::new(45).unwrap().get(), 45);
/// assert!(IntervalMins::new(0).is_err());
/// assert!(IntervalMins::new(-10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntervalMins(u32);

impl IntervalMins {
    /// Interval used when the caller does not supply one.
    pub const DEFAULT: IntervalMins = IntervalMins(30);

    /// Validate a caller-supplied interval.
    pub fn new(mins: i64) -> Result<Self, InvalidInterval> {
        if mins <= 0 {
            return Err(InvalidInterval(mins));
        }
        u32::try_from(mins)
            .map(IntervalMins)
            .map_err(|_| InvalidInterval(mins))
    }

    /// The interval in minutes.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for IntervalMins {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for IntervalMins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_thirty_minutes() {
        assert_eq!(IntervalMins::default().get(), 30);
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert_eq!(IntervalMins::new(0), Err(InvalidInterval(0)));
        assert_eq!(IntervalMins::new(-10), Err(InvalidInterval(-10)));
    }

    #[test]
    fn rejects_values_beyond_u32() {
        assert!(IntervalMins::new(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn error_display() {
        let err = InvalidInterval(-5);
        assert_eq!(
            err.to_string(),
            "interval must be a positive whole number of minutes, got -5"
        );
    }
}
