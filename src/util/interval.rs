//! Sampling interval parser for CLI arguments.

use std::time::Duration;

/// Error type for interval parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalParseError {
    pub input: String,
    pub message: String,
}

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid interval '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for IntervalParseError {}

/// Parses an interval in seconds, fractional values allowed.
///
/// ```
/// use schedstat_diff::util::parse_interval;
///
/// assert_eq!(parse_interval("0.5").unwrap(), 0.5);
/// assert!(parse_interval("soon").is_err());
/// ```
pub fn parse_interval(input: &str) -> Result<f64, IntervalParseError> {
    let error = |message: &str| IntervalParseError {
        input: input.to_string(),
        message: message.to_string(),
    };

    let secs: f64 = input
        .trim()
        .parse()
        .map_err(|_| error("Interval must be a number (seconds)."))?;

    if !secs.is_finite() {
        return Err(error("Interval must be a finite number of seconds."));
    }
    if secs < 0.0 {
        return Err(error("Interval must not be negative."));
    }
    Ok(secs)
}

/// Converts a value accepted by [`parse_interval`] into a sleep duration.
pub fn interval_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval_valid() {
        assert_eq!(parse_interval("1").unwrap(), 1.0);
        assert_eq!(parse_interval("2.5").unwrap(), 2.5);
        assert_eq!(parse_interval(" 10 ").unwrap(), 10.0);
        assert_eq!(parse_interval("0").unwrap(), 0.0);
        assert_eq!(parse_interval("1e-3").unwrap(), 0.001);
    }

    #[test]
    fn test_parse_interval_not_a_number() {
        let err = parse_interval("abc").unwrap_err();
        assert_eq!(err.input, "abc");
        assert_eq!(
            err.to_string(),
            "Invalid interval 'abc': Interval must be a number (seconds)."
        );
        assert!(parse_interval("").is_err());
        assert!(parse_interval("1s").is_err());
    }

    #[test]
    fn test_parse_interval_rejects_negative_and_non_finite() {
        assert!(parse_interval("-1").is_err());
        assert!(parse_interval("inf").is_err());
        assert!(parse_interval("NaN").is_err());
    }

    #[test]
    fn test_interval_duration() {
        assert_eq!(interval_duration(1.5), Duration::from_millis(1500));
        assert_eq!(interval_duration(0.0), Duration::ZERO);
    }
}
