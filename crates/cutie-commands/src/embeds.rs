//! Embeds and buttons for reminders, giveaways and polls.
//!
//! Shared by the creation commands and by the dispatcher announcements so a
//! message looks the same when it is posted and when it is closed.

use cutie_common::{discord_relative_timestamp, truncate_string, RoleId};
use cutie_i18n::{FluentValue, Messages};
use cutie_scheduling::{
    ComponentAction, Giveaway, GiveawayOutcome, Poll, PollTally, Reminder, ScheduledItem,
};
use poise::serenity_prelude as serenity;

/// Colour of reminder embeds.
pub const REMINDER_COLOR: u32 = 0x34_98DB;

/// Colour of the reminder confirmation.
pub const CONFIRMATION_COLOR: u32 = 0x2E_CC71;

/// Colour of poll embeds.
pub const POLL_COLOR: u32 = 0x34_98DB;

const BUTTON_LABEL_LIMIT: usize = 80;
const BUTTONS_PER_ROW: usize = 5;

/// Confirmation shown to the user who set a reminder.
pub fn reminder_set_embed(messages: &Messages, reminder: &Reminder) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(messages.get("reminder-set-title"))
        .description(messages.format(
            "reminder-set-description",
            &[("message", reminder.message.as_str().into())],
        ))
        .field(
            messages.get("reminder-time-field"),
            discord_relative_timestamp(reminder.due_at()),
            false,
        )
        .colour(CONFIRMATION_COLOR)
}

/// Text posted with a due reminder, mentioning its owner.
pub fn reminder_content(messages: &Messages, reminder: &Reminder) -> String {
    messages.format(
        "reminder-delivered",
        &[("user", reminder.user_id.mention().into())],
    )
}

/// Embed of a due reminder.
pub fn reminder_embed(messages: &Messages, reminder: &Reminder) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(messages.get("reminder-title"))
        .description(reminder.message.clone())
        .colour(REMINDER_COLOR)
}

fn role_mentions(roles: &[RoleId]) -> String {
    roles
        .iter()
        .map(|role| role.mention())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Body text of a running giveaway.
pub fn giveaway_description(messages: &Messages, giveaway: &Giveaway) -> String {
    messages.format(
        "giveaway-description",
        &[
            ("prize", giveaway.prize.as_str().into()),
            ("description", giveaway.description.as_str().into()),
            ("ends", discord_relative_timestamp(giveaway.due_at()).into()),
        ],
    )
}

/// Embed of a running giveaway, listing every configured requirement.
pub fn giveaway_embed(messages: &Messages, giveaway: &Giveaway) -> serenity::CreateEmbed {
    let requirements = &giveaway.requirements;
    let mut embed = serenity::CreateEmbed::new()
        .title(messages.get("giveaway-title"))
        .description(giveaway_description(messages, giveaway))
        .colour(giveaway.color)
        .field(
            messages.get("giveaway-winners-field"),
            giveaway.winner_count.to_string(),
            true,
        )
        .field(
            messages.get("giveaway-host-field"),
            giveaway.host_id.mention(),
            true,
        );

    if let Some(role) = requirements.required_role_id {
        embed = embed.field(messages.get("giveaway-required-role-field"), role.mention(), true);
    }
    if let Some(days) = requirements.min_account_age {
        embed = embed.field(
            messages.get("giveaway-account-age-field"),
            messages.format("giveaway-account-age-value", &[("days", days.into())]),
            true,
        );
    }
    if !requirements.allowed_roles.is_empty() {
        embed = embed.field(
            messages.get("giveaway-allowed-roles-field"),
            role_mentions(&requirements.allowed_roles),
            false,
        );
    }
    if !requirements.excluded_roles.is_empty() {
        embed = embed.field(
            messages.get("giveaway-excluded-roles-field"),
            role_mentions(&requirements.excluded_roles),
            false,
        );
    }

    embed
}

/// The enter button of the giveaway stored under `giveaway_id`.
pub fn giveaway_components(messages: &Messages, giveaway_id: &str) -> Vec<serenity::CreateActionRow> {
    let action = ComponentAction::EnterGiveaway {
        giveaway_id: giveaway_id.to_string(),
    };
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(action.to_string())
            .label(messages.get("giveaway-enter-button"))
            .style(serenity::ButtonStyle::Primary),
    ])]
}

/// Body text of a finished giveaway.
pub fn giveaway_ended_description(
    messages: &Messages,
    giveaway: &Giveaway,
    outcome: &GiveawayOutcome,
) -> String {
    if outcome.has_winners() {
        messages.format(
            "giveaway-ended-winners",
            &[
                ("prize", giveaway.prize.as_str().into()),
                ("winners", outcome.mentions().into()),
            ],
        )
    } else {
        messages.format(
            "giveaway-ended-no-entries",
            &[("prize", giveaway.prize.as_str().into())],
        )
    }
}

/// Embed replacing the giveaway announcement once it ended.
pub fn giveaway_ended_embed(
    messages: &Messages,
    giveaway: &Giveaway,
    outcome: &GiveawayOutcome,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(messages.get("giveaway-ended-title"))
        .description(giveaway_ended_description(messages, giveaway, outcome))
        .colour(giveaway.color)
}

/// Message congratulating the winners, `None` when nobody entered.
pub fn giveaway_congratulations(
    messages: &Messages,
    giveaway: &Giveaway,
    outcome: &GiveawayOutcome,
) -> Option<String> {
    outcome.has_winners().then(|| {
        messages.format(
            "giveaway-congratulations",
            &[
                ("winners", outcome.mentions().into()),
                ("prize", giveaway.prize.as_str().into()),
            ],
        )
    })
}

/// Numbered option list of a poll.
pub fn poll_options_text(poll: &Poll) -> String {
    poll.options()
        .iter()
        .enumerate()
        .map(|(index, option)| format!("{}. {}", index + 1, option))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Embed of an open poll.
pub fn poll_embed(messages: &Messages, poll: &Poll) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(messages.format("poll-title", &[("title", poll.title.as_str().into())]))
        .description(messages.format(
            "poll-description",
            &[
                ("description", poll.description.as_str().into()),
                ("ends", discord_relative_timestamp(poll.due_at()).into()),
            ],
        ))
        .field(messages.get("poll-options-field"), poll_options_text(poll), false)
        .field(
            messages.get("poll-creator-field"),
            poll.creator_id.mention(),
            true,
        )
        .colour(POLL_COLOR)
}

/// One vote button per option of the poll stored under `poll_id`.
pub fn poll_components(poll: &Poll, poll_id: &str) -> Vec<serenity::CreateActionRow> {
    let buttons: Vec<serenity::CreateButton> = poll
        .options()
        .iter()
        .enumerate()
        .map(|(option, label)| {
            let action = ComponentAction::Vote {
                poll_id: poll_id.to_string(),
                option,
            };
            serenity::CreateButton::new(action.to_string())
                .label(truncate_string(label, BUTTON_LABEL_LIMIT))
                .style(serenity::ButtonStyle::Primary)
        })
        .collect();

    buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|row| serenity::CreateActionRow::Buttons(row.to_vec()))
        .collect()
}

/// One line per option with its count and share.
pub fn poll_results_text(messages: &Messages, tally: &PollTally) -> String {
    tally
        .rows
        .iter()
        .map(|row| {
            messages.format(
                "poll-results-line",
                &[
                    ("option", row.label.as_str().into()),
                    ("votes", FluentValue::from(row.votes)),
                    ("percentage", format!("{:.1}", row.percentage).into()),
                ],
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Embed with the final results of a poll.
pub fn poll_results_embed(
    messages: &Messages,
    poll: &Poll,
    tally: &PollTally,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(messages.format(
            "poll-results-title",
            &[("title", poll.title.as_str().into())],
        ))
        .description(poll.description.clone())
        .field(
            messages.get("poll-results-field"),
            poll_results_text(messages, tally),
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(messages.format(
            "poll-results-total",
            &[("total", FluentValue::from(tally.total))],
        )))
        .colour(POLL_COLOR)
}

/// Message posted next to the results of a closed poll.
pub fn poll_ended_content(messages: &Messages, poll: &Poll) -> String {
    messages.format("poll-ended", &[("title", poll.title.as_str().into())])
}
