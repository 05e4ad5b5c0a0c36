use anyhow::{Context, Result};
use chrono::DateTime;
use chrono_tz::Tz;
use std::fmt;
use tracing::warn;

/// 12-hour wall clock without a leading zero, e.g. `3:04PM`.
pub const CLOCK_FORMAT: &str = "%-I:%M%p";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTime {
    pub location: String,
    pub clock: String,
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The current time in {} is {}.", self.location, self.clock)
    }
}

/// Renders an RFC 3339 timestamp as wall-clock time in `location`.
///
/// When `location` is not an IANA zone name the offset carried by the
/// timestamp is used instead.
pub fn format_clock(datetime: &str, location: &str) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(datetime)
        .with_context(|| format!("Invalid datetime '{}'", datetime))?;

    let clock = match location.parse::<Tz>() {
        Ok(tz) => parsed.with_timezone(&tz).format(CLOCK_FORMAT).to_string(),
        Err(_) => {
            warn!(
                "Unknown time zone '{}', using the offset of {}",
                location, datetime
            );
            parsed.format(CLOCK_FORMAT).to_string()
        }
    };

    Ok(clock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn afternoon_in_shanghai() {
        assert_eq!(
            format_clock("2024-01-01T15:04:05+08:00", "Asia/Shanghai").unwrap(),
            "3:04PM"
        );
    }

    #[test]
    fn converts_into_the_named_zone() {
        // 15:04 in Shanghai is 07:04 UTC, which is 02:04 in New York in January.
        assert_eq!(
            format_clock("2024-01-01T15:04:05+08:00", "America/New_York").unwrap(),
            "2:04AM"
        );
    }

    #[test]
    fn midnight_and_noon() {
        assert_eq!(format_clock("2024-06-01T00:30:00+00:00", "UTC").unwrap(), "12:30AM");
        assert_eq!(format_clock("2024-06-01T12:00:00+00:00", "UTC").unwrap(), "12:00PM");
    }

    #[test]
    fn accepts_fractional_seconds() {
        assert_eq!(
            format_clock("2024-01-01T09:05:59.123456+01:00", "Europe/Paris").unwrap(),
            "9:05AM"
        );
    }

    #[test]
    fn unknown_zone_keeps_the_timestamp_offset() {
        assert_eq!(
            format_clock("2024-01-01T15:04:05+08:00", "Beijing, China").unwrap(),
            "3:04PM"
        );
    }

    #[test]
    fn rejects_unparsable_datetime() {
        let err = format_clock("yesterday", "Asia/Shanghai").unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn sentence_format() {
        let local = LocalTime {
            location: "Asia/Shanghai".to_string(),
            clock: "3:04PM".to_string(),
        };
        assert_eq!(local.to_string(), "The current time in Asia/Shanghai is 3:04PM.");
    }
}
