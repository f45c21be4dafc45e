//! Poll creation and setup commands.

use crate::checks::ensure_role;
use crate::embeds;
use crate::framework::{reply_ephemeral, retract_on_error, Context, Error};
use crate::ids;
use chrono::{Duration, Utc};
use cutie_common::MessageId;
use cutie_config::{Config, PollConfig, MAX_POLL_OPTIONS};
use cutie_i18n::Messages;
use cutie_scheduling::{parse_options, Poll};
use poise::serenity_prelude as serenity;
use tracing::{error, info};

/// A rejected `/createpoll` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollInputError {
    /// Options are blank, repeated, too few or too many.
    Options {
        /// Fewest accepted options.
        min: usize,
        /// Most accepted options.
        max: usize,
    },
    /// Duration outside `1..=max` hours.
    Duration {
        /// Longest accepted duration.
        max: u32,
    },
}

impl PollInputError {
    /// Localized explanation for the user.
    pub fn message(self, messages: &Messages) -> String {
        match self {
            Self::Options { min, max } => messages.format(
                "poll-invalid-options",
                &[("min", min.into()), ("max", max.into())],
            ),
            Self::Duration { max } => {
                messages.format("poll-invalid-duration", &[("max", max.into())])
            }
        }
    }
}

/// Splits and checks the options, then checks the duration.
///
/// # Errors
///
/// Returns the first argument that is out of range.
pub fn validate_input(
    options: &str,
    duration_hours: u32,
    limits: &PollConfig,
) -> Result<Vec<String>, PollInputError> {
    let max = limits.max_options.min(MAX_POLL_OPTIONS);
    let min = limits.min_options.min(max);

    let options = parse_options(options, min, max)
        .map_err(|_| PollInputError::Options { min, max })?;

    if !(1..=limits.max_duration_hours).contains(&duration_hours) {
        return Err(PollInputError::Duration {
            max: limits.max_duration_hours,
        });
    }

    Ok(options)
}

/// Create a new poll
#[poise::command(slash_command, guild_only)]
pub async fn createpoll(
    ctx: Context<'_>,
    #[description = "The title of the poll"] title: String,
    #[description = "Description of the poll"] description: String,
    #[description = "Comma-separated options (e.g. Yes, No, Maybe)"] options: String,
    #[description = "Duration in hours"] duration: u32,
) -> Result<(), Error> {
    let data = ctx.data();
    let messages = &data.messages;
    let config = data.config.get();

    if !ensure_role(ctx, config.polls.manager_role_id).await? {
        return Ok(());
    }

    let Some(channel_id) = config.polls.channel_id.and_then(ids::channel) else {
        return reply_ephemeral(ctx, messages.get("poll-no-channel")).await;
    };

    let options = match validate_input(&options, duration, &config.polls) {
        Ok(options) => options,
        Err(e) => return reply_ephemeral(ctx, e.message(messages)).await,
    };

    ctx.defer_ephemeral().await?;

    let mut poll = match Poll::new(
        ids::channel_of(channel_id),
        title,
        description,
        options,
        Utc::now() + Duration::hours(i64::from(duration)),
        ids::user_of(ctx.author().id),
    ) {
        Ok(poll) => poll,
        Err(e) => return reply_ephemeral(ctx, e.to_string()).await,
    };

    let mut post = serenity::CreateMessage::new().embed(embeds::poll_embed(messages, &poll));
    if let Some(role) = config.polls.ping_role_id {
        post = post.content(messages.format("poll-announcement", &[("role", role.mention().into())]));
    }
    let message = channel_id.send_message(ctx.http(), post).await?;
    let id = message.id.to_string();
    poll.attach_message(MessageId(message.id.get()));

    let buttons = channel_id
        .edit_message(
            ctx.http(),
            message.id,
            serenity::EditMessage::new().components(embeds::poll_components(&poll, &id)),
        )
        .await;
    retract_on_error(buttons, "add poll buttons", message.delete(ctx.http())).await?;

    let saved = data.polls.lock().await.add(id.clone(), poll);
    if retract_on_error(saved, "save the poll", message.delete(ctx.http()))
        .await
        .is_err()
    {
        return reply_ephemeral(ctx, messages.get("error-storage")).await;
    }

    info!("Poll {} created by {}", id, ctx.author().id);
    let text = messages.format(
        "poll-created",
        &[("channel", ids::channel_of(channel_id).mention().into())],
    );
    reply_ephemeral(ctx, text).await
}

/// Setup the poll system
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn setuppoll(
    ctx: Context<'_>,
    #[description = "Channel where polls will be posted"] poll_channel: serenity::GuildChannel,
    #[description = "Role to ping for new polls"] poll_role: serenity::Role,
    #[description = "Role required to create polls"] required_role: serenity::Role,
) -> Result<(), Error> {
    let data = ctx.data();
    let messages = &data.messages;
    let channel = ids::channel_of(poll_channel.id);
    let ping = ids::role_of(poll_role.id);
    let manager = ids::role_of(required_role.id);

    let apply = |config: &mut Config| {
        config.polls.channel_id = Some(channel);
        config.polls.ping_role_id = Some(ping);
        config.polls.manager_role_id = Some(manager);
    };
    if let Err(e) = data.config_loader.update_file(apply) {
        error!("Failed to persist poll setup: {}", e);
        return reply_ephemeral(ctx, messages.get("error-storage")).await;
    }
    data.config.modify(apply);

    info!("Poll channel set to {} by {}", channel, ctx.author().id);
    let embed = serenity::CreateEmbed::new()
        .title(messages.get("poll-setup-title"))
        .description(messages.get("poll-setup-description"))
        .field(messages.get("poll-setup-channel-field"), channel.mention(), false)
        .field(messages.get("poll-setup-ping-field"), ping.mention(), false)
        .field(messages.get("poll-setup-role-field"), manager.mention(), false)
        .colour(embeds::POLL_COLOR);
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_within_limits() {
        let limits = PollConfig::default();
        assert_eq!(
            validate_input("Yes, No", 24, &limits).unwrap(),
            vec!["Yes".to_string(), "No".to_string()]
        );
        assert_eq!(
            validate_input("Only", 24, &limits),
            Err(PollInputError::Options { min: 2, max: 5 })
        );
        assert_eq!(
            validate_input("a,b,c,d,e,f", 24, &limits),
            Err(PollInputError::Options { min: 2, max: 5 })
        );
        assert_eq!(
            validate_input("Yes,yes,Yes", 24, &limits),
            Err(PollInputError::Options { min: 2, max: 5 })
        );
    }

    #[test]
    fn test_duration_limits() {
        let limits = PollConfig::default();
        assert_eq!(
            validate_input("Yes, No", 0, &limits),
            Err(PollInputError::Duration { max: 168 })
        );
        assert!(validate_input("Yes, No", 168, &limits).is_ok());
    }

    #[test]
    fn test_configured_maximum_is_capped() {
        let limits = PollConfig {
            max_options: 9,
            ..PollConfig::default()
        };
        assert_eq!(
            validate_input("a,b,c,d,e,f", 24, &limits),
            Err(PollInputError::Options { min: 2, max: MAX_POLL_OPTIONS })
        );
    }
}
