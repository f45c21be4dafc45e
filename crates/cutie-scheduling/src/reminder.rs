//! Personal reminders.

use crate::error::DraftError;
use crate::item::{Dispatchable, ItemKind, ScheduledItem};
use chrono::{DateTime, Duration, Utc};
use cutie_common::{timestamp, ChannelId, UserId};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A message delivered to a user in a channel at a later time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReminderRecord")]
pub struct Reminder {
    /// User to remind.
    pub user_id: UserId,
    /// Channel the reminder is posted in.
    pub channel_id: ChannelId,
    /// Reminder text.
    pub message: String,
    due_at: DateTime<Utc>,
}

impl Reminder {
    /// Creates a reminder due `delay` after `now`.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Empty`] when `message` is blank.
    pub fn new(
        user_id: UserId,
        channel_id: ChannelId,
        message: impl Into<String>,
        now: DateTime<Utc>,
        delay: Duration,
    ) -> Result<Self, DraftError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DraftError::Empty("message"));
        }

        Ok(Self {
            user_id,
            channel_id,
            message,
            due_at: now + delay,
        })
    }

    /// Store key of the reminder, `"{user_id}_{due unix seconds}"`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}_{}", self.user_id, self.due_at.timestamp())
    }
}

impl ScheduledItem for Reminder {
    const KIND: ItemKind = ItemKind::Reminder;

    fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    fn owner_id(&self) -> UserId {
        self.user_id
    }

    fn delivery_channel_id(&self) -> ChannelId {
        self.channel_id
    }
}

impl Dispatchable for Reminder {
    type Outcome = ();

    fn resolve<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self::Outcome {}
}

#[derive(Deserialize)]
struct ReminderRecord {
    user_id: UserId,
    channel_id: ChannelId,
    message: String,
    #[serde(alias = "end_time", deserialize_with = "timestamp::deserialize")]
    due_at: DateTime<Utc>,
}

impl TryFrom<ReminderRecord> for Reminder {
    type Error = DraftError;

    fn try_from(record: ReminderRecord) -> Result<Self, Self::Error> {
        if record.message.trim().is_empty() {
            return Err(DraftError::Empty("message"));
        }

        Ok(Self {
            user_id: record.user_id,
            channel_id: record.channel_id,
            message: record.message,
            due_at: record.due_at,
        })
    }
}
