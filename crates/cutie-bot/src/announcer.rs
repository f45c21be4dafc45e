//! Delivers due reminders, giveaways and polls to Discord.

use async_trait::async_trait;
use cutie_commands::{embeds, ids};
use cutie_i18n::Messages;
use cutie_scheduling::{
    Announcer, DeliveryError, Giveaway, GiveawayOutcome, Poll, PollTally, Reminder,
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::warn;

/// Announces due items through the Discord HTTP API.
pub struct DiscordAnnouncer {
    http: Arc<serenity::Http>,
    messages: Arc<Messages>,
}

impl DiscordAnnouncer {
    /// Creates an announcer sending through `http`.
    pub fn new(http: Arc<serenity::Http>, messages: Arc<Messages>) -> Self {
        Self { http, messages }
    }

    async fn resolve_channel(
        &self,
        id: cutie_common::ChannelId,
    ) -> Result<serenity::ChannelId, DeliveryError> {
        let channel = ids::channel(id)
            .ok_or_else(|| DeliveryError::DestinationGone(format!("channel {id}")))?;
        channel
            .to_channel(self.http.as_ref())
            .await
            .map_err(|e| classify(e, &format!("channel {id}")))?;
        Ok(channel)
    }

    /// Replaces the embed of a posted message and removes its buttons.
    async fn close_message(
        &self,
        channel: serenity::ChannelId,
        message_id: Option<cutie_common::MessageId>,
        embed: serenity::CreateEmbed,
    ) -> Result<(), DeliveryError> {
        let message = message_id
            .and_then(ids::message)
            .ok_or_else(|| DeliveryError::DestinationGone("message never posted".to_string()))?;

        channel
            .edit_message(
                self.http.as_ref(),
                message,
                serenity::EditMessage::new().embed(embed).components(vec![]),
            )
            .await
            .map_err(|e| classify(e, &format!("message {message}")))?;
        Ok(())
    }
}

/// Sorts a Discord error into a vanished destination or a platform failure.
pub fn classify(error: serenity::Error, what: &str) -> DeliveryError {
    match &error {
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if matches!(response.status_code.as_u16(), 403 | 404) =>
        {
            DeliveryError::DestinationGone(format!("{what}: {error}"))
        }
        _ => DeliveryError::Platform(format!("{what}: {error}")),
    }
}

#[async_trait]
impl Announcer<Reminder> for DiscordAnnouncer {
    async fn announce(&self, _id: &str, reminder: &Reminder, _outcome: &()) -> Result<(), DeliveryError> {
        let channel = self.resolve_channel(reminder.channel_id).await?;

        let user = ids::user(reminder.user_id)
            .ok_or_else(|| DeliveryError::DestinationGone(format!("user {}", reminder.user_id)))?;
        user.to_user(self.http.as_ref())
            .await
            .map_err(|e| classify(e, &format!("user {}", reminder.user_id)))?;

        channel
            .send_message(
                self.http.as_ref(),
                serenity::CreateMessage::new()
                    .content(embeds::reminder_content(&self.messages, reminder))
                    .embed(embeds::reminder_embed(&self.messages, reminder)),
            )
            .await
            .map_err(|e| classify(e, &format!("channel {}", reminder.channel_id)))?;
        Ok(())
    }
}

#[async_trait]
impl Announcer<Giveaway> for DiscordAnnouncer {
    async fn announce(
        &self,
        id: &str,
        giveaway: &Giveaway,
        outcome: &GiveawayOutcome,
    ) -> Result<(), DeliveryError> {
        let channel = self.resolve_channel(giveaway.channel_id).await?;

        let ended = embeds::giveaway_ended_embed(&self.messages, giveaway, outcome);
        self.close_message(channel, giveaway.message_id, ended).await?;

        if let Some(text) = embeds::giveaway_congratulations(&self.messages, giveaway, outcome) {
            channel
                .send_message(
                    self.http.as_ref(),
                    serenity::CreateMessage::new()
                        .content(text)
                        .allowed_mentions(serenity::CreateAllowedMentions::new().all_users(true)),
                )
                .await
                .map_err(|e| classify(e, &format!("giveaway {id}")))?;
        } else {
            warn!("Giveaway {} ended without entries", id);
        }
        Ok(())
    }
}

#[async_trait]
impl Announcer<Poll> for DiscordAnnouncer {
    async fn announce(&self, id: &str, poll: &Poll, tally: &PollTally) -> Result<(), DeliveryError> {
        let channel = self.resolve_channel(poll.channel_id).await?;

        let results = embeds::poll_results_embed(&self.messages, poll, tally);
        self.close_message(channel, poll.message_id, results.clone())
            .await?;

        channel
            .send_message(
                self.http.as_ref(),
                serenity::CreateMessage::new()
                    .content(embeds::poll_ended_content(&self.messages, poll))
                    .embed(results),
            )
            .await
            .map_err(|e| classify(e, &format!("poll {id}")))?;
        Ok(())
    }
}
