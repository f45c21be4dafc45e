//! Integration tests for cutie-i18n.

use cutie_i18n::{FluentLoader, FluentValue, Messages, DEFAULT_LOCALE};
use proptest::prelude::*;

#[test]
fn test_available_locales() {
    assert_eq!(FluentLoader::available_locales(), vec![DEFAULT_LOCALE]);
}

#[test]
fn test_reminder_messages() {
    let messages = Messages::load(DEFAULT_LOCALE).unwrap();

    assert_eq!(messages.get("reminder-title"), "⏰ Reminder");
    assert_eq!(
        messages.format("reminder-delivered", &[("user", FluentValue::from("<@1>"))]),
        "<@1> Here's your reminder!"
    );
    assert_eq!(
        messages.format("reminder-set-description", &[("message", "stretch".into())]),
        "I'll remind you about:\nstretch"
    );
}

#[test]
fn test_giveaway_multiline_message_keeps_blank_line() {
    let messages = Messages::load(DEFAULT_LOCALE).unwrap();

    let text = messages.format("giveaway-ended-no-entries", &[("prize", "Nitro".into())]);
    assert_eq!(text, "Prize: **Nitro**\n\nNo valid entries were received.");
}

#[test]
fn test_poll_result_line() {
    let messages = Messages::load(DEFAULT_LOCALE).unwrap();

    let text = messages.format(
        "poll-results-line",
        &[
            ("option", "Yes".into()),
            ("votes", FluentValue::from(2)),
            ("percentage", "66.7".into()),
        ],
    );
    assert_eq!(text, "Yes: 2 votes (66.7%)");
}

#[test]
fn test_missing_argument_leaves_placeholder() {
    let messages = Messages::load(DEFAULT_LOCALE).unwrap();

    let text = messages.get("poll-voted");
    assert!(text.starts_with("You voted for: "));
}

proptest! {
    #[test]
    fn prop_prize_is_rendered_verbatim(prize in "[A-Za-z0-9 ]{1,40}") {
        let messages = Messages::load(DEFAULT_LOCALE).unwrap();
        let text = messages.format(
            "giveaway-congratulations",
            &[("winners", "<@1>".into()), ("prize", prize.as_str().into())],
        );
        let expected = format!("**{prize}**");
        prop_assert!(text.contains(&expected));
    }
}
