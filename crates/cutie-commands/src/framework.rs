//! Poise framework setup and command registration logic.

use cutie_config::{ConfigCache, ConfigLoader};
use cutie_i18n::Messages;
use cutie_scheduling::{Giveaway, Poll, Reminder, SharedStore};
use poise::serenity_prelude as serenity;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Application data accessible in all commands.
pub struct Data {
    /// Live configuration, updated by the setup commands.
    pub config: Arc<ConfigCache>,
    /// Writes configuration changes back to the config file.
    pub config_loader: Arc<ConfigLoader>,
    /// Pending reminders.
    pub reminders: SharedStore<Reminder>,
    /// Running giveaways.
    pub giveaways: SharedStore<Giveaway>,
    /// Open polls.
    pub polls: SharedStore<Poll>,
    /// User-facing text.
    pub messages: Arc<Messages>,
    /// When the process started.
    pub started_at: Instant,
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Every slash command of the bot.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        crate::remind::remind(),
        crate::giveaway::creategiveaway(),
        crate::giveaway::setupgiveaway(),
        crate::poll::createpoll(),
        crate::poll::setuppoll(),
        crate::botinfo::botinfo(),
    ]
}

/// Creates a new Poise framework.
pub fn create_framework() -> poise::FrameworkBuilder<Data, Error> {
    poise::Framework::builder().options(poise::FrameworkOptions {
        commands: commands(),
        on_error: |error| Box::pin(on_error(error)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(event_handler(ctx, event, framework, data))
        },
        ..Default::default()
    })
}

/// Sends `text` visible only to the invoking user.
///
/// # Errors
///
/// Returns the Discord error if the reply cannot be sent.
pub async fn reply_ephemeral(ctx: Context<'_>, text: impl Into<String>) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
        .await?;
    Ok(())
}

/// Passes `result` through, running `retract` first when it failed.
///
/// Creation commands post their announcement before the buttons and the
/// record exist. When a later step fails, `retract` deletes that post so no
/// announcement is left that nobody can enter or vote on.
///
/// # Errors
///
/// Returns the error of `result` unchanged.
pub async fn retract_on_error<T, E, R>(
    result: Result<T, E>,
    step: &str,
    retract: R,
) -> Result<T, E>
where
    E: std::fmt::Display,
    R: Future<Output = Result<(), serenity::Error>>,
{
    if let Err(e) = &result {
        error!("Failed to {}, withdrawing the announcement: {}", step, e);
        if let Err(delete) = retract.await {
            warn!("Failed to delete the announcement: {}", delete);
        }
    }
    result
}

/// Global error handler for the framework
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command '{}': {:?}", ctx.command().name, error);
            let reply = poise::CreateReply::default()
                .content(ctx.data().messages.get("error-generic"))
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to report command error: {:?}", e);
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(
                "Error in event handler for {:?}: {:?}",
                event.snake_case_name(),
                error
            );
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {:?}", e);
            }
        }
    }
}

/// Central event handler for Discord events
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Logged in as {}", data_about_bot.user.name);
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => {
            crate::interactions::handle_component(ctx, component, data).await?;
        }
        _ => {}
    }
    Ok(())
}
