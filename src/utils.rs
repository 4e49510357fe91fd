use crate::config::{MAX_DURATION_SECS, MAX_QUANTITY, MIN_DURATION_SECS, MIN_QUANTITY};
use once_cell::sync::Lazy;
use regex::Regex;

// Compiled regexes for duration parsing
static DURATION_MIN_SEC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)m\s*(\d+)s$").unwrap());
static DURATION_MIN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)m$").unwrap());
static DURATION_COLON_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):(\d{2})$").unwrap());
static DURATION_SEC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s*s(?:ec)?$").unwrap());

/// Duration parsing error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    EmptyInput,
    InvalidFormat(String),
    InvalidSeconds(u32),
    Zero,
    TooLong(u32),
}

impl std::fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationParseError::EmptyInput => write!(f, "Duration cannot be empty"),
            DurationParseError::InvalidFormat(hint) => {
                write!(f, "Invalid duration format. {}", hint)
            }
            DurationParseError::InvalidSeconds(s) => {
                write!(f, "Invalid seconds: {} (must be 0-59)", s)
            }
            DurationParseError::Zero => write!(f, "Duration must be at least 1 second"),
            DurationParseError::TooLong(s) => {
                write!(f, "Duration of {}s is too long (max {}s)", s, MAX_DURATION_SECS)
            }
        }
    }
}

impl std::error::Error for DurationParseError {}

fn number(text: &str) -> Result<u32, DurationParseError> {
    // Digits-only captures can still overflow u32.
    text.parse().map_err(|_| DurationParseError::TooLong(u32::MAX))
}

fn minutes_and_seconds(minutes: u32, seconds: u32) -> Result<u32, DurationParseError> {
    if seconds > 59 {
        return Err(DurationParseError::InvalidSeconds(seconds));
    }
    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or(DurationParseError::TooLong(u32::MAX))
}

/// Parse a duration string in various formats to whole seconds.
///
/// Supported formats:
/// - Pure number: "45" (seconds)
/// - Seconds: "45s" or "45 sec"
/// - Minutes: "2m"
/// - Minutes and seconds: "1m 30s" or "1m30s"
/// - Colon format: "1:30" (minutes:seconds)
///
/// The result is always between 1 second and [`MAX_DURATION_SECS`].
pub fn parse_duration_secs(input: &str) -> Result<u32, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::EmptyInput);
    }

    let secs = if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        number(trimmed)?
    } else if let Some(captures) = DURATION_SEC_REGEX.captures(trimmed) {
        number(&captures[1])?
    } else if let Some(captures) = DURATION_MIN_SEC_REGEX.captures(trimmed) {
        minutes_and_seconds(number(&captures[1])?, number(&captures[2])?)?
    } else if let Some(captures) = DURATION_COLON_REGEX.captures(trimmed) {
        minutes_and_seconds(number(&captures[1])?, number(&captures[2])?)?
    } else if let Some(captures) = DURATION_MIN_REGEX.captures(trimmed) {
        minutes_and_seconds(number(&captures[1])?, 0)?
    } else {
        return Err(DurationParseError::InvalidFormat(
            "Use: 45, 45s, 1:30, 1m30s or 2m".to_string(),
        ));
    };

    match secs {
        s if s < MIN_DURATION_SECS => Err(DurationParseError::Zero),
        s if s > MAX_DURATION_SECS => Err(DurationParseError::TooLong(s)),
        s => Ok(s),
    }
}

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}

/// Validate timer quantity input
pub fn validate_quantity(input: &str) -> Result<u32, String> {
    validate_numeric_input(input, Some(MIN_QUANTITY), Some(MAX_QUANTITY), "Quantity")
}

/// "45 sec", "2 min" or "1:30 min" for list badges.
pub fn format_duration(secs: u32) -> String {
    match (secs / 60, secs % 60) {
        (0, s) => format!("{} sec", s),
        (m, 0) => format!("{} min", m),
        (m, s) => format!("{}:{:02} min", m, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_duration_secs("45"), Ok(45));
        assert_eq!(parse_duration_secs(" 45s "), Ok(45));
        assert_eq!(parse_duration_secs("45 sec"), Ok(45));
        assert_eq!(parse_duration_secs("2m"), Ok(120));
        assert_eq!(parse_duration_secs("1m30s"), Ok(90));
        assert_eq!(parse_duration_secs("1m 30s"), Ok(90));
        assert_eq!(parse_duration_secs("1:30"), Ok(90));
        assert_eq!(parse_duration_secs("0:05"), Ok(5));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert_eq!(parse_duration_secs(""), Err(DurationParseError::EmptyInput));
        assert_eq!(parse_duration_secs("0"), Err(DurationParseError::Zero));
        assert_eq!(parse_duration_secs("0:00"), Err(DurationParseError::Zero));
        assert_eq!(parse_duration_secs("-5"), Err(DurationParseError::InvalidFormat(
            "Use: 45, 45s, 1:30, 1m30s or 2m".to_string()
        )));
        assert!(matches!(
            parse_duration_secs("ten"),
            Err(DurationParseError::InvalidFormat(_))
        ));
        assert_eq!(
            parse_duration_secs("1:75"),
            Err(DurationParseError::InvalidSeconds(75))
        );
    }

    #[test]
    fn rejects_overlong_durations() {
        assert_eq!(
            parse_duration_secs("90000"),
            Err(DurationParseError::TooLong(90_000))
        );
        assert!(matches!(
            parse_duration_secs("99999999999"),
            Err(DurationParseError::TooLong(_))
        ));
    }

    #[test]
    fn quantity_bounds() {
        assert_eq!(validate_quantity("3"), Ok(3));
        assert!(validate_quantity("0").unwrap_err().contains("at least 1"));
        assert!(validate_quantity("101").unwrap_err().contains("cannot exceed"));
        assert!(validate_quantity("two").unwrap_err().contains("valid number"));
    }

    #[test]
    fn formats_badges() {
        assert_eq!(format_duration(45), "45 sec");
        assert_eq!(format_duration(120), "2 min");
        assert_eq!(format_duration(90), "1:30 min");
    }
}
