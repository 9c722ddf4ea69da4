//! Parsing of human readable durations like `500ms`, `3s` or `1m30s`

use std::time::Duration;
use thiserror::Error;

/// Error returned when a duration string can not be used as an interval
#[derive(Debug, Error)]
pub enum DurationParseError {
    /// Input contained nothing but whitespace
    #[error("empty duration")]
    Empty,
    /// Input is neither a number of seconds nor a sequence of values with units
    #[error("invalid duration: {0}")]
    Invalid(#[from] humantime::DurationError),
    /// Duration is zero, which no interval or timeout can use
    #[error("duration must be greater than zero")]
    Zero,
}

/// Parses a strictly positive duration.
///
/// Plain integers are interpreted as seconds, everything else is handed to
/// [`humantime::parse_duration`] (e.g. `500ms`, `3s`, `1m30s`, `1h`).
pub fn parse_duration(src: &str) -> Result<Duration, DurationParseError> {
    let input = src.trim();

    if input.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let duration = match input.parse::<u64>() {
        Ok(seconds) => Duration::from_secs(seconds),
        Err(_) => humantime::parse_duration(input)?,
    };

    if duration.is_zero() {
        return Err(DurationParseError::Zero);
    }

    Ok(duration)
}

#[cfg(test)]
mod does {
    use super::*;

    #[test]
    fn parse_plain_seconds() {
        assert_eq!(parse_duration("30").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn parse_units() {
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn reject_zero() {
        assert!(matches!(parse_duration("0"), Err(DurationParseError::Zero)));
        assert!(matches!(parse_duration("0s"), Err(DurationParseError::Zero)));
        assert!(matches!(parse_duration("0ms"), Err(DurationParseError::Zero)));
    }

    #[test]
    fn reject_garbage() {
        assert!(matches!(parse_duration(" "), Err(DurationParseError::Empty)));
        assert!(matches!(
            parse_duration("10 parsecs"),
            Err(DurationParseError::Invalid(_))
        ));
        assert!(matches!(parse_duration("soon"), Err(DurationParseError::Invalid(_))));
    }
}
