//! Giveaways with eligibility requirements and a uniform winner draw.

use crate::error::DraftError;
use crate::item::{Dispatchable, ItemKind, ScheduledItem};
use chrono::{DateTime, Utc};
use cutie_common::{timestamp, ChannelId, GuildId, MessageId, RoleId, UserId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conditions an entrant has to meet. Every configured gate must pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    /// Role every entrant must hold.
    pub required_role_id: Option<RoleId>,
    /// Minimum account age in whole days.
    pub min_account_age: Option<u32>,
    /// Entrants must hold at least one of these roles when non-empty.
    pub allowed_roles: Vec<RoleId>,
    /// Entrants must hold none of these roles.
    pub excluded_roles: Vec<RoleId>,
}

/// Why an entrant failed the requirements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Ineligible {
    /// The entrant lacks the required role.
    #[error("missing required role {0}")]
    MissingRequiredRole(RoleId),

    /// The account is younger than the minimum age.
    #[error("account must be at least {min_days} days old")]
    AccountTooYoung {
        /// Minimum age in days.
        min_days: u32,
    },

    /// The entrant holds none of the allowed roles.
    #[error("none of the allowed roles")]
    NotInAllowedRoles,

    /// The entrant holds an excluded role.
    #[error("holds excluded role {0}")]
    ExcludedRole(RoleId),
}

impl Requirements {
    /// Whether no gate is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required_role_id.is_none()
            && self.min_account_age.is_none()
            && self.allowed_roles.is_empty()
            && self.excluded_roles.is_empty()
    }

    /// Checks `entrant` against every gate, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first gate that fails.
    pub fn check(&self, entrant: &Entrant, now: DateTime<Utc>) -> Result<(), Ineligible> {
        if let Some(role) = self.required_role_id {
            if !entrant.has_role(role) {
                return Err(Ineligible::MissingRequiredRole(role));
            }
        }

        if let Some(min_days) = self.min_account_age {
            if entrant.account_age_days(now) < i64::from(min_days) {
                return Err(Ineligible::AccountTooYoung { min_days });
            }
        }

        if !self.allowed_roles.is_empty()
            && !self.allowed_roles.iter().any(|role| entrant.has_role(*role))
        {
            return Err(Ineligible::NotInAllowedRoles);
        }

        if let Some(role) = self.excluded_roles.iter().find(|role| entrant.has_role(**role)) {
            return Err(Ineligible::ExcludedRole(*role));
        }

        Ok(())
    }
}

/// The user pressing the enter button, as seen by the requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrant {
    /// User id.
    pub id: UserId,
    /// Roles held in the giveaway's guild.
    pub roles: Vec<RoleId>,
    /// Account creation time.
    pub account_created_at: DateTime<Utc>,
}

impl Entrant {
    fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    fn account_age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.account_created_at).num_days()
    }
}

/// A giveaway announced in a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GiveawayRecord")]
pub struct Giveaway {
    /// Announcement message, known once it has been posted.
    pub message_id: Option<MessageId>,
    /// Channel of the announcement.
    pub channel_id: ChannelId,
    /// Guild of the announcement.
    pub guild_id: Option<GuildId>,
    /// What is given away.
    pub prize: String,
    /// Free-form description.
    pub description: String,
    /// Number of winners to draw.
    pub winner_count: u32,
    due_at: DateTime<Utc>,
    /// User who started the giveaway.
    pub host_id: UserId,
    /// Entry requirements.
    #[serde(flatten)]
    pub requirements: Requirements,
    /// Embed colour.
    pub color: u32,
    entries: Vec<UserId>,
}

/// Fields of a giveaway collected by the creation command.
#[derive(Debug, Clone)]
pub struct GiveawayDraft {
    /// Channel to announce in.
    pub channel_id: ChannelId,
    /// Guild of the channel.
    pub guild_id: Option<GuildId>,
    /// What is given away.
    pub prize: String,
    /// Free-form description.
    pub description: String,
    /// Number of winners to draw.
    pub winner_count: u32,
    /// User starting the giveaway.
    pub host_id: UserId,
    /// Entry requirements.
    pub requirements: Requirements,
    /// Embed colour.
    pub color: u32,
}

impl Giveaway {
    /// Builds a giveaway ending at `due_at`. The message id is attached
    /// after the announcement is posted.
    ///
    /// # Errors
    ///
    /// Fails when the prize is blank or no winner would be drawn.
    pub fn new(draft: GiveawayDraft, due_at: DateTime<Utc>) -> Result<Self, DraftError> {
        if draft.prize.trim().is_empty() {
            return Err(DraftError::Empty("prize"));
        }
        if draft.winner_count == 0 {
            return Err(DraftError::NoWinners);
        }

        Ok(Self {
            message_id: None,
            channel_id: draft.channel_id,
            guild_id: draft.guild_id,
            prize: draft.prize,
            description: draft.description,
            winner_count: draft.winner_count,
            due_at,
            host_id: draft.host_id,
            requirements: draft.requirements,
            color: draft.color,
            entries: Vec::new(),
        })
    }

    /// Records the id of the posted announcement.
    pub fn attach_message(&mut self, message_id: MessageId) {
        self.message_id = Some(message_id);
    }

    /// Users who entered, in entry order.
    #[must_use]
    pub fn entries(&self) -> &[UserId] {
        &self.entries
    }

    /// Whether `user` already entered.
    #[must_use]
    pub fn has_entered(&self, user: UserId) -> bool {
        self.entries.contains(&user)
    }

    /// Adds `user` to the entrants. Returns `false` if already present.
    pub fn enter(&mut self, user: UserId) -> bool {
        if self.has_entered(user) {
            return false;
        }
        self.entries.push(user);
        true
    }

    /// Draws `min(winner_count, entries)` distinct winners uniformly.
    pub fn draw_winners<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<UserId> {
        let count = usize::try_from(self.winner_count).unwrap_or(usize::MAX);
        self.entries.choose_multiple(rng, count).copied().collect()
    }
}

/// Result of a finished giveaway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveawayOutcome {
    /// Drawn winners, empty when nobody entered.
    pub winners: Vec<UserId>,
}

impl GiveawayOutcome {
    /// Whether nobody entered.
    #[must_use]
    pub fn has_winners(&self) -> bool {
        !self.winners.is_empty()
    }

    /// Winners as a comma separated list of mentions.
    #[must_use]
    pub fn mentions(&self) -> String {
        self.winners
            .iter()
            .map(|id| id.mention())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ScheduledItem for Giveaway {
    const KIND: ItemKind = ItemKind::Giveaway;

    fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    fn owner_id(&self) -> UserId {
        self.host_id
    }

    fn delivery_channel_id(&self) -> ChannelId {
        self.channel_id
    }
}

impl Dispatchable for Giveaway {
    type Outcome = GiveawayOutcome;

    fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Outcome {
        GiveawayOutcome {
            winners: self.draw_winners(rng),
        }
    }
}

/// Parses a comma separated list of role ids, skipping invalid entries.
#[must_use]
pub fn parse_role_list(input: Option<&str>) -> Vec<RoleId> {
    input
        .map(cutie_common::parse_id_list)
        .unwrap_or_default()
        .into_iter()
        .map(RoleId)
        .collect()
}

#[derive(Deserialize)]
struct GiveawayRecord {
    #[serde(default)]
    message_id: Option<MessageId>,
    channel_id: ChannelId,
    #[serde(default)]
    guild_id: Option<GuildId>,
    prize: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "winners")]
    winner_count: u32,
    #[serde(alias = "end_time", deserialize_with = "timestamp::deserialize")]
    due_at: DateTime<Utc>,
    host_id: UserId,
    #[serde(flatten)]
    requirements: Requirements,
    #[serde(default = "default_color")]
    color: u32,
    #[serde(default)]
    entries: Vec<UserId>,
}

const fn default_color() -> u32 {
    0x2F_3136
}

impl TryFrom<GiveawayRecord> for Giveaway {
    type Error = DraftError;

    fn try_from(record: GiveawayRecord) -> Result<Self, Self::Error> {
        if record.winner_count == 0 {
            return Err(DraftError::NoWinners);
        }

        let mut entries: Vec<UserId> = Vec::with_capacity(record.entries.len());
        for user in record.entries {
            if !entries.contains(&user) {
                entries.push(user);
            }
        }

        Ok(Self {
            // Older files used 0 as the not-yet-posted placeholder.
            message_id: record.message_id.filter(|id| id.get() != 0),
            channel_id: record.channel_id,
            guild_id: record.guild_id,
            prize: record.prize,
            description: record.description,
            winner_count: record.winner_count,
            due_at: record.due_at,
            host_id: record.host_id,
            requirements: record.requirements,
            color: record.color,
            entries,
        })
    }
}
