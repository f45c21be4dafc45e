//! Core bot logic using the Poise framework.

use crate::announcer::DiscordAnnouncer;
use crate::error::BotResult;
use cutie_commands::{create_framework, Data};
use cutie_config::{Config, ConfigCache, ConfigLoader};
use cutie_i18n::Messages;
use cutie_scheduling::{Dispatcher, Giveaway, Poll, RecordStore, Reminder, SharedStore};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Main bot structure.
pub struct CutieBot {
    config: Arc<ConfigCache>,
    loader: Arc<ConfigLoader>,
    messages: Arc<Messages>,
    reminders: SharedStore<Reminder>,
    giveaways: SharedStore<Giveaway>,
    polls: SharedStore<Poll>,
    started_at: Instant,
}

impl CutieBot {
    /// Creates a bot and loads the record stores named in `config`.
    pub fn new(config: Config, loader: ConfigLoader, messages: Messages) -> Self {
        let reminders = RecordStore::load(config.storage.reminders_path()).shared();
        let giveaways = RecordStore::load(config.storage.giveaways_path()).shared();
        let polls = RecordStore::load(config.storage.polls_path()).shared();

        Self {
            config: Arc::new(ConfigCache::new(config)),
            loader: Arc::new(loader),
            messages: Arc::new(messages),
            reminders,
            giveaways,
            polls,
            started_at: Instant::now(),
        }
    }

    /// Shared reminder store.
    pub fn reminders(&self) -> &SharedStore<Reminder> {
        &self.reminders
    }

    /// Shared giveaway store.
    pub fn giveaways(&self) -> &SharedStore<Giveaway> {
        &self.giveaways
    }

    /// Shared poll store.
    pub fn polls(&self) -> &SharedStore<Poll> {
        &self.polls
    }

    /// Connects to Discord and runs until the gateway closes or Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns the Discord error when the client cannot be built or the
    /// gateway connection fails.
    pub async fn start(self) -> BotResult<()> {
        let config = self.config.get();
        let token = config.discord.token.clone();
        let guild_id = config
            .discord
            .guild_id
            .filter(|id| id.get() != 0)
            .map(|id| serenity::GuildId::new(id.get()));
        let period = Duration::from_secs(config.scheduler.check_interval_seconds);

        let data = Data {
            config: Arc::clone(&self.config),
            config_loader: Arc::clone(&self.loader),
            reminders: Arc::clone(&self.reminders),
            giveaways: Arc::clone(&self.giveaways),
            polls: Arc::clone(&self.polls),
            messages: Arc::clone(&self.messages),
            started_at: self.started_at,
        };

        let framework = create_framework()
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("Logged in as {}", ready.user.name);
                    let commands = &framework.options().commands;
                    match guild_id {
                        Some(guild) => {
                            poise::builtins::register_in_guild(ctx, commands, guild).await?;
                            info!("Registered {} commands in guild {}", commands.len(), guild);
                        }
                        None => {
                            poise::builtins::register_globally(ctx, commands).await?;
                            info!("Registered {} commands globally", commands.len());
                        }
                    }
                    Ok(data)
                })
            })
            .build();

        let mut client =
            serenity::ClientBuilder::new(&token, serenity::GatewayIntents::non_privileged())
                .framework(framework)
                .await?;

        let shutdown = CancellationToken::new();
        let announcer = Arc::new(DiscordAnnouncer::new(
            Arc::clone(&client.http),
            Arc::clone(&self.messages),
        ));

        let dispatchers = vec![
            tokio::spawn(
                Dispatcher::new(Arc::clone(&self.reminders), Arc::clone(&announcer))
                    .run(period, shutdown.clone()),
            ),
            tokio::spawn(
                Dispatcher::new(Arc::clone(&self.giveaways), Arc::clone(&announcer))
                    .run(period, shutdown.clone()),
            ),
            tokio::spawn(
                Dispatcher::new(Arc::clone(&self.polls), Arc::clone(&announcer))
                    .run(period, shutdown.clone()),
            ),
        ];

        let shard_manager = Arc::clone(&client.shard_manager);
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
            info!("Received Ctrl+C, shutting down");
            signal_token.cancel();
            shard_manager.shutdown_all().await;
        });

        let result = client.start().await;

        shutdown.cancel();
        for handle in dispatchers {
            if let Err(e) = handle.await {
                warn!("Dispatcher task ended abnormally: {}", e);
            }
        }
        info!("Cutie Bot stopped");

        result.map_err(Into::into)
    }
}
