//! Conversions between stored ids and serenity ids.
//!
//! Serenity ids cannot be zero, so conversions from stored ids are fallible.

use cutie_common::{ChannelId, MessageId, RoleId, UserId};
use poise::serenity_prelude as serenity;

/// Serenity channel id for a stored one.
pub fn channel(id: ChannelId) -> Option<serenity::ChannelId> {
    (id.get() != 0).then(|| serenity::ChannelId::new(id.get()))
}

/// Serenity message id for a stored one.
pub fn message(id: MessageId) -> Option<serenity::MessageId> {
    (id.get() != 0).then(|| serenity::MessageId::new(id.get()))
}

/// Serenity user id for a stored one.
pub fn user(id: UserId) -> Option<serenity::UserId> {
    (id.get() != 0).then(|| serenity::UserId::new(id.get()))
}

/// Stored role id for a serenity one.
pub fn role_of(id: serenity::RoleId) -> RoleId {
    RoleId(id.get())
}

/// Stored user id for a serenity one.
pub fn user_of(id: serenity::UserId) -> UserId {
    UserId(id.get())
}

/// Stored channel id for a serenity one.
pub fn channel_of(id: serenity::ChannelId) -> ChannelId {
    ChannelId(id.get())
}
