//! Integration tests for cutie-common crate.

use chrono::{Duration, TimeZone, Utc};
use cutie_common::{
    discord_relative_timestamp, parse_duration, parse_hex_color, parse_id_list,
    truncate_string, ChannelId, CutieError, RoleId, UserId,
};

#[test]
fn test_id_display() {
    assert_eq!(format!("{}", ChannelId(123_456_789)), "123456789");
    assert_eq!(format!("{}", UserId(987_654_321)), "987654321");
}

#[test]
fn test_mentions() {
    assert_eq!(UserId(42).mention(), "<@42>");
    assert_eq!(RoleId(7).mention(), "<@&7>");
    assert_eq!(ChannelId(9).mention(), "<#9>");
}

#[test]
fn test_relative_timestamp_uses_unix_seconds() {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(discord_relative_timestamp(timestamp), "<t:1704110400:R>");
}

#[test]
fn test_truncate_string_counts_characters() {
    let input = "ééééééééééééééé";
    let truncated = truncate_string(input, 8);
    assert_eq!(truncated, "ééééé...");
}

#[test]
fn test_reminder_style_durations() {
    assert_eq!(parse_duration("1h").unwrap(), Duration::hours(1));
    assert_eq!(parse_duration("90m").unwrap(), Duration::minutes(90));

    match parse_duration("1y") {
        Err(CutieError::Validation(message)) => assert!(message.contains('y')),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_giveaway_style_inputs() {
    assert_eq!(parse_hex_color("#00ff00").unwrap(), 0x00_FF00);
    assert_eq!(parse_id_list("10,20, nope ,30"), vec![10, 20, 30]);
}
