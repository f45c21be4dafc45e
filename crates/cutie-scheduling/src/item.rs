//! Traits shared by every kind of scheduled item.

use chrono::{DateTime, Utc};
use cutie_common::{ChannelId, UserId};
use rand::Rng;
use std::fmt;

/// The kinds of scheduled items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A personal reminder.
    Reminder,
    /// A giveaway with a winner draw.
    Giveaway,
    /// A poll with a vote tally.
    Poll,
}

impl ItemKind {
    /// Lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::Giveaway => "giveaway",
            Self::Poll => "poll",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that becomes due at a fixed instant.
pub trait ScheduledItem {
    /// Kind of the item.
    const KIND: ItemKind;

    /// Instant after which the item is delivered. Never changes.
    fn due_at(&self) -> DateTime<Utc>;

    /// User who created the item.
    fn owner_id(&self) -> UserId;

    /// Channel the delivery goes to.
    fn delivery_channel_id(&self) -> ChannelId;

    /// Whether the item is due at `now`.
    fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_at()
    }
}

/// A scheduled item the dispatcher can deliver.
pub trait Dispatchable: ScheduledItem + Clone + Send + Sync + 'static {
    /// What the delivery announces.
    type Outcome: Send + Sync;

    /// Computes the outcome of the item once it is due.
    fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Outcome;
}
