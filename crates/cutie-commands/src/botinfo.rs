//! Bot info command accessing framework data through Poise's context.

use crate::framework::{Context, Error};
use std::time::Duration;

/// Formats an uptime as days, hours, minutes and seconds.
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        total % 86_400 / 3_600,
        total % 3_600 / 60,
        total % 60,
    );

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

/// Shows version, uptime and pending items
#[poise::command(slash_command)]
pub async fn botinfo(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let messages = &data.messages;

    let reminders = data.reminders.lock().await.len();
    let giveaways = data.giveaways.lock().await.len();
    let polls = data.polls.lock().await.len();

    let embed = poise::serenity_prelude::CreateEmbed::new()
        .title(messages.get("botinfo-title"))
        .field(
            messages.get("botinfo-version-field"),
            env!("CARGO_PKG_VERSION"),
            true,
        )
        .field(
            messages.get("botinfo-uptime-field"),
            format_uptime(data.started_at.elapsed()),
            true,
        )
        .field(
            messages.get("botinfo-pending-field"),
            messages.format(
                "botinfo-pending-value",
                &[
                    ("reminders", reminders.into()),
                    ("giveaways", giveaways.into()),
                    ("polls", polls.into()),
                ],
            ),
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
