//! Reminder command.

use crate::embeds;
use crate::framework::{reply_ephemeral, Context, Error};
use crate::ids;
use chrono::{Duration, Utc};
use cutie_common::parse_duration;
use cutie_scheduling::{DraftError, Reminder};
use tracing::{error, info};

/// Checks a parsed reminder delay against the configured maximum.
pub fn check_delay(delay: Duration, max_days: u32) -> bool {
    delay > Duration::zero() && delay <= Duration::days(i64::from(max_days))
}

/// Set a reminder
#[poise::command(slash_command)]
pub async fn remind(
    ctx: Context<'_>,
    #[description = "When to remind you (e.g. 30s, 10m, 2h, 1d)"] time: String,
    #[description = "What to remind you about"] message: String,
) -> Result<(), Error> {
    let data = ctx.data();
    let messages = &data.messages;
    let max_days = data.config.get().reminders.max_duration_days;

    let Ok(delay) = parse_duration(&time) else {
        return reply_ephemeral(ctx, messages.get("reminder-invalid-time")).await;
    };

    if !check_delay(delay, max_days) {
        let text = messages.format("reminder-too-long", &[("days", max_days.into())]);
        return reply_ephemeral(ctx, text).await;
    }

    let reminder = match Reminder::new(
        ids::user_of(ctx.author().id),
        ids::channel_of(ctx.channel_id()),
        message,
        Utc::now(),
        delay,
    ) {
        Ok(reminder) => reminder,
        Err(DraftError::Empty(_)) => {
            return reply_ephemeral(ctx, messages.get("reminder-empty")).await;
        }
        Err(e) => return Err(e.into()),
    };

    let embed = embeds::reminder_set_embed(messages, &reminder);
    let id = reminder.id();
    let saved = data.reminders.lock().await.add(id.clone(), reminder);
    if let Err(e) = saved {
        error!("Failed to save reminder {}: {}", id, e);
        return reply_ephemeral(ctx, messages.get("error-storage")).await;
    }

    info!("Reminder {} set by {}", id, ctx.author().id);
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_bounds() {
        assert!(check_delay(Duration::seconds(1), 1));
        assert!(check_delay(Duration::days(1), 1));
        assert!(!check_delay(Duration::days(1) + Duration::seconds(1), 1));
        assert!(!check_delay(Duration::zero(), 1));
    }
}
