//! Polls with one vote per user and a per-option tally.

use crate::error::DraftError;
use crate::item::{Dispatchable, ItemKind, ScheduledItem};
use chrono::{DateTime, Utc};
use cutie_common::{timestamp, ChannelId, MessageId, UserId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A poll posted in a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PollRecord")]
pub struct Poll {
    /// Poll message, known once it has been posted.
    pub message_id: Option<MessageId>,
    /// Channel of the poll message.
    pub channel_id: ChannelId,
    /// Poll title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    options: Vec<String>,
    due_at: DateTime<Utc>,
    /// User who created the poll.
    pub creator_id: UserId,
    votes: BTreeMap<String, BTreeSet<UserId>>,
}

/// The vote a user held before voting again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteChange {
    /// Label of the chosen option.
    pub option: String,
    /// Label of the option the vote moved away from.
    pub previous: Option<String>,
}

impl Poll {
    /// Builds a poll closing at `due_at`. The message id is attached after
    /// the poll is posted.
    ///
    /// # Errors
    ///
    /// Fails when the title is blank, no options are given or two options
    /// share a label.
    pub fn new(
        channel_id: ChannelId,
        title: impl Into<String>,
        description: impl Into<String>,
        options: Vec<String>,
        due_at: DateTime<Utc>,
        creator_id: UserId,
    ) -> Result<Self, DraftError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DraftError::Empty("title"));
        }
        check_options(&options)?;

        let votes = options
            .iter()
            .map(|option| (option.clone(), BTreeSet::new()))
            .collect();

        Ok(Self {
            message_id: None,
            channel_id,
            title,
            description: description.into(),
            options,
            due_at,
            creator_id,
            votes,
        })
    }

    /// Records the id of the posted poll message.
    pub fn attach_message(&mut self, message_id: MessageId) {
        self.message_id = Some(message_id);
    }

    /// Option labels in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Voters of `option`, if it exists.
    #[must_use]
    pub fn voters(&self, option: &str) -> Option<&BTreeSet<UserId>> {
        self.votes.get(option)
    }

    /// Option `voter` currently votes for.
    #[must_use]
    pub fn vote_of(&self, voter: UserId) -> Option<&str> {
        self.options
            .iter()
            .find(|option| self.votes.get(*option).is_some_and(|set| set.contains(&voter)))
            .map(String::as_str)
    }

    /// Moves `voter` to the option at `index`, removing any earlier vote.
    /// Returns `None` when the index is out of range.
    pub fn vote(&mut self, voter: UserId, index: usize) -> Option<VoteChange> {
        let option = self.options.get(index)?.clone();
        let previous = self.vote_of(voter).map(ToString::to_string);

        for voters in self.votes.values_mut() {
            voters.remove(&voter);
        }
        self.votes.entry(option.clone()).or_default().insert(voter);

        Some(VoteChange { option, previous })
    }

    /// Counts the votes of every option.
    #[must_use]
    pub fn tally(&self) -> PollTally {
        let counts: Vec<(String, usize)> = self
            .options
            .iter()
            .map(|option| (option.clone(), self.votes.get(option).map_or(0, BTreeSet::len)))
            .collect();
        let total: usize = counts.iter().map(|(_, votes)| votes).sum();

        let rows = counts
            .into_iter()
            .map(|(label, votes)| OptionTally {
                percentage: percentage(votes, total),
                label,
                votes,
            })
            .collect();

        PollTally { rows, total }
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(votes: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        votes as f64 / total as f64 * 100.0
    }
}

/// Vote count of one option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionTally {
    /// Option label.
    pub label: String,
    /// Number of votes.
    pub votes: usize,
    /// Share of all votes, 0 to 100.
    pub percentage: f64,
}

/// Result of a closed poll, rows in option order.
#[derive(Debug, Clone, PartialEq)]
pub struct PollTally {
    /// One row per option.
    pub rows: Vec<OptionTally>,
    /// Votes over all options.
    pub total: usize,
}

impl ScheduledItem for Poll {
    const KIND: ItemKind = ItemKind::Poll;

    fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    fn owner_id(&self) -> UserId {
        self.creator_id
    }

    fn delivery_channel_id(&self) -> ChannelId {
        self.channel_id
    }
}

impl Dispatchable for Poll {
    type Outcome = PollTally;

    fn resolve<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self::Outcome {
        self.tally()
    }
}

/// Splits a comma separated option list and checks its length.
///
/// # Errors
///
/// Fails when an option is blank, two options repeat, or the count is
/// outside `min..=max`.
pub fn parse_options(input: &str, min: usize, max: usize) -> Result<Vec<String>, DraftError> {
    let options: Vec<String> = input.split(',').map(|o| o.trim().to_string()).collect();

    if options.iter().any(String::is_empty) {
        return Err(DraftError::Empty("option"));
    }
    if options.len() < min || options.len() > max {
        return Err(DraftError::OptionCount {
            min,
            max,
            found: options.len(),
        });
    }
    check_options(&options)?;

    Ok(options)
}

fn check_options(options: &[String]) -> Result<(), DraftError> {
    if options.is_empty() {
        return Err(DraftError::OptionCount {
            min: 1,
            max: usize::MAX,
            found: 0,
        });
    }

    let mut seen = BTreeSet::new();
    for option in options {
        if !seen.insert(option.as_str()) {
            return Err(DraftError::DuplicateOption(option.clone()));
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct PollRecord {
    #[serde(default)]
    message_id: Option<MessageId>,
    channel_id: ChannelId,
    title: String,
    #[serde(default)]
    description: String,
    options: Vec<String>,
    #[serde(alias = "end_time", deserialize_with = "timestamp::deserialize")]
    due_at: DateTime<Utc>,
    creator_id: UserId,
    #[serde(default)]
    votes: BTreeMap<String, Vec<UserId>>,
}

impl TryFrom<PollRecord> for Poll {
    type Error = DraftError;

    fn try_from(mut record: PollRecord) -> Result<Self, Self::Error> {
        check_options(&record.options)?;

        // Walk options in display order so a voter listed twice keeps the
        // first vote. Keys that are not options are dropped.
        let mut counted = BTreeSet::new();
        let mut votes = BTreeMap::new();
        for option in &record.options {
            let voters: BTreeSet<UserId> = record
                .votes
                .remove(option)
                .unwrap_or_default()
                .into_iter()
                .filter(|voter| counted.insert(*voter))
                .collect();
            votes.insert(option.clone(), voters);
        }

        Ok(Self {
            message_id: record.message_id.filter(|id| id.get() != 0),
            channel_id: record.channel_id,
            title: record.title,
            description: record.description,
            options: record.options,
            due_at: record.due_at,
            creator_id: record.creator_id,
            votes,
        })
    }
}
