//! Giveaway creation and setup commands.

use crate::checks::ensure_role;
use crate::embeds;
use crate::framework::{reply_ephemeral, retract_on_error, Context, Error};
use crate::ids;
use chrono::{Duration, Utc};
use cutie_common::{parse_hex_color, MessageId};
use cutie_config::Config;
use cutie_i18n::Messages;
use cutie_scheduling::{parse_role_list, Giveaway, GiveawayDraft, Requirements};
use poise::serenity_prelude as serenity;
use tracing::{error, info};

/// Longest accepted minimum account age in days.
pub const MAX_ACCOUNT_AGE_DAYS: u32 = 3650;

/// A rejected `/creategiveaway` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveawayInputError {
    /// Winner count outside `1..=max`.
    Winners {
        /// Highest accepted count.
        max: u32,
    },
    /// Duration outside `1..=max` hours.
    Duration {
        /// Longest accepted duration.
        max: u32,
    },
    /// Minimum account age outside the accepted range.
    AccountAge,
    /// Colour is not a hex code.
    Color,
}

impl GiveawayInputError {
    /// Localized explanation for the user.
    pub fn message(self, messages: &Messages) -> String {
        match self {
            Self::Winners { max } => {
                messages.format("giveaway-invalid-winners", &[("max", max.into())])
            }
            Self::Duration { max } => {
                messages.format("giveaway-invalid-duration", &[("max", max.into())])
            }
            Self::AccountAge => messages.get("giveaway-invalid-account-age"),
            Self::Color => messages.get("giveaway-invalid-color"),
        }
    }
}

/// Numeric `/creategiveaway` arguments.
#[derive(Debug, Clone, Copy)]
pub struct GiveawayInput<'a> {
    /// Requested winner count.
    pub winners: u32,
    /// Requested duration in hours.
    pub duration_hours: u32,
    /// Requested minimum account age in days.
    pub min_account_age: Option<u32>,
    /// Requested colour as hex.
    pub color: Option<&'a str>,
}

/// Checks the numeric arguments against the limits and resolves the colour.
///
/// # Errors
///
/// Returns the first argument that is out of range.
pub fn validate_input(
    input: GiveawayInput<'_>,
    max_winners: u32,
    max_duration_hours: u32,
    default_color: u32,
) -> Result<u32, GiveawayInputError> {
    if !(1..=max_winners).contains(&input.winners) {
        return Err(GiveawayInputError::Winners { max: max_winners });
    }
    if !(1..=max_duration_hours).contains(&input.duration_hours) {
        return Err(GiveawayInputError::Duration {
            max: max_duration_hours,
        });
    }
    if input
        .min_account_age
        .is_some_and(|days| !(1..=MAX_ACCOUNT_AGE_DAYS).contains(&days))
    {
        return Err(GiveawayInputError::AccountAge);
    }

    input.color.map_or(Ok(default_color), |color| {
        parse_hex_color(color).map_err(|_| GiveawayInputError::Color)
    })
}

/// Create a new giveaway
#[poise::command(slash_command, guild_only)]
#[allow(clippy::too_many_arguments)]
pub async fn creategiveaway(
    ctx: Context<'_>,
    #[description = "Channel to post the giveaway in"] channel: serenity::GuildChannel,
    #[description = "What is being given away"] prize: String,
    #[description = "Description of the giveaway"] description: String,
    #[description = "Number of winners"] winners: u32,
    #[description = "Duration in hours"] duration: u32,
    #[description = "Role required to enter"] required_role: Option<serenity::Role>,
    #[description = "Minimum account age in days"] min_account_age: Option<u32>,
    #[description = "Comma-separated role IDs allowed to enter"] allowed_roles: Option<String>,
    #[description = "Comma-separated role IDs excluded from entering"]
    excluded_roles: Option<String>,
    #[description = "Embed color as hex (e.g. #FF0000)"] color: Option<String>,
) -> Result<(), Error> {
    let data = ctx.data();
    let messages = &data.messages;
    let config = data.config.get();

    if !ensure_role(ctx, config.giveaways.manager_role_id).await? {
        return Ok(());
    }

    let input = GiveawayInput {
        winners,
        duration_hours: duration,
        min_account_age,
        color: color.as_deref(),
    };
    let color = match validate_input(
        input,
        config.giveaways.max_winners,
        config.giveaways.max_duration_hours,
        config.giveaways.default_color,
    ) {
        Ok(color) => color,
        Err(e) => return reply_ephemeral(ctx, e.message(messages)).await,
    };

    ctx.defer_ephemeral().await?;

    let draft = GiveawayDraft {
        channel_id: ids::channel_of(channel.id),
        guild_id: ctx.guild_id().map(|id| cutie_common::GuildId(id.get())),
        prize,
        description,
        winner_count: winners,
        host_id: ids::user_of(ctx.author().id),
        requirements: Requirements {
            required_role_id: required_role.map(|role| ids::role_of(role.id)),
            min_account_age,
            allowed_roles: parse_role_list(allowed_roles.as_deref()),
            excluded_roles: parse_role_list(excluded_roles.as_deref()),
        },
        color,
    };
    let mut giveaway = match Giveaway::new(draft, Utc::now() + Duration::hours(i64::from(duration)))
    {
        Ok(giveaway) => giveaway,
        Err(e) => return reply_ephemeral(ctx, e.to_string()).await,
    };

    let message = channel
        .id
        .send_message(
            ctx.http(),
            serenity::CreateMessage::new().embed(embeds::giveaway_embed(messages, &giveaway)),
        )
        .await?;
    let id = message.id.to_string();
    giveaway.attach_message(MessageId(message.id.get()));

    let buttons = channel
        .id
        .edit_message(
            ctx.http(),
            message.id,
            serenity::EditMessage::new().components(embeds::giveaway_components(messages, &id)),
        )
        .await;
    retract_on_error(buttons, "add giveaway buttons", message.delete(ctx.http())).await?;

    let saved = data.giveaways.lock().await.add(id.clone(), giveaway);
    if retract_on_error(saved, "save the giveaway", message.delete(ctx.http()))
        .await
        .is_err()
    {
        return reply_ephemeral(ctx, messages.get("error-storage")).await;
    }

    info!("Giveaway {} created by {} in {}", id, ctx.author().id, channel.id);
    let text = messages.format(
        "giveaway-created",
        &[("channel", ids::channel_of(channel.id).mention().into())],
    );
    reply_ephemeral(ctx, text).await
}

/// Setup the giveaway system
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn setupgiveaway(
    ctx: Context<'_>,
    #[description = "Role required to create giveaways"] required_role: serenity::Role,
) -> Result<(), Error> {
    let data = ctx.data();
    let messages = &data.messages;
    let role = ids::role_of(required_role.id);

    let apply = |config: &mut Config| config.giveaways.manager_role_id = Some(role);
    if let Err(e) = data.config_loader.update_file(apply) {
        error!("Failed to persist giveaway setup: {}", e);
        return reply_ephemeral(ctx, messages.get("error-storage")).await;
    }
    data.config.modify(apply);

    info!("Giveaway manager role set to {} by {}", role, ctx.author().id);
    let embed = serenity::CreateEmbed::new()
        .title(messages.get("giveaway-setup-title"))
        .description(messages.get("giveaway-setup-description"))
        .field(messages.get("giveaway-setup-role-field"), role.mention(), false)
        .colour(cutie_config::DEFAULT_GIVEAWAY_COLOR);
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
