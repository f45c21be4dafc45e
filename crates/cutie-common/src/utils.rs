//! Shared utility functions for parsing user input and formatting output.

use crate::types::CutieError;
use chrono::{DateTime, Duration, Utc};

/// Formats a timestamp as a Discord relative timestamp (`<t:...:R>`).
pub fn discord_relative_timestamp(timestamp: DateTime<Utc>) -> String {
    format!("<t:{}:R>", timestamp.timestamp())
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Parses a duration such as `30s`, `15m`, `2h` or `7d`.
///
/// The amount must be a positive integer followed by a single unit letter.
///
/// # Errors
///
/// Returns [`CutieError::Validation`] when the unit is unknown, the amount is
/// not a positive integer, or the result overflows.
pub fn parse_duration(input: &str) -> Result<Duration, CutieError> {
    let input = input.trim();
    let Some(unit) = input.chars().last() else {
        return Err(CutieError::Validation("duration is empty".to_string()));
    };

    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .trim()
        .parse()
        .map_err(|_| CutieError::Validation(format!("`{input}` is not a number followed by a unit")))?;

    if amount <= 0 {
        return Err(CutieError::Validation("duration must be positive".to_string()));
    }

    let seconds_per_unit = match unit.to_ascii_lowercase() {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        other => {
            return Err(CutieError::Validation(format!("unknown duration unit `{other}`")));
        }
    };

    amount
        .checked_mul(seconds_per_unit)
        .and_then(Duration::try_seconds)
        .ok_or_else(|| CutieError::Validation("duration is too long".to_string()))
}

/// Parses a hex colour code with an optional leading `#`.
///
/// # Errors
///
/// Returns [`CutieError::Validation`] when the input is not a 24-bit hex value.
pub fn parse_hex_color(input: &str) -> Result<u32, CutieError> {
    let digits = input.trim().trim_start_matches('#');
    let invalid = || CutieError::Validation(format!("`{input}` is not a hex colour code"));

    if digits.is_empty() || digits.len() > 6 {
        return Err(invalid());
    }

    u32::from_str_radix(digits, 16).map_err(|_| invalid())
}

/// Parses a comma-separated list of numeric ids, skipping invalid entries.
pub fn parse_id_list(input: &str) -> Vec<u64> {
    input
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_discord_relative_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(discord_relative_timestamp(timestamp), "<t:1704067200:R>");
    }

    #[test]
    fn test_truncate_string() {
        let input = "This is a very long string that should be truncated";
        let truncated = truncate_string(input, 20);
        assert_eq!(truncated, "This is a very lo...");

        let short = "Short";
        let not_truncated = truncate_string(short, 20);
        assert_eq!(not_truncated, "Short");
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("45s").unwrap(), Duration::seconds(45));
        assert_eq!(parse_duration("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_duration("2H").unwrap(), Duration::hours(2));
        assert_eq!(parse_duration(" 1d ").unwrap(), Duration::days(1));
    }

    #[test]
    fn test_parse_duration_rejects_bad_input() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("5w").is_err());
        assert!(parse_duration("0m").is_err());
        assert!(parse_duration("-3h").is_err());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#2F3136").unwrap(), 0x2F_3136);
        assert_eq!(parse_hex_color("ff0000").unwrap(), 0xFF_0000);
        assert!(parse_hex_color("#").is_err());
        assert!(parse_hex_color("not a colour").is_err());
        assert!(parse_hex_color("1234567").is_err());
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 2,x,  3"), vec![1, 2, 3]);
        assert!(parse_id_list("").is_empty());
    }
}
