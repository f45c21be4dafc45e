//! Giveaway entries and poll votes from button presses.
//!
//! Both operations reject once the item is due, so a record the dispatcher
//! has picked up is never changed afterwards. The current time is read from
//! `clock` only after the store lock is held, so a caller waiting on the lock
//! cannot act on a stale time. A rejection leaves the store untouched.

use crate::error::StoreError;
use crate::giveaway::{Entrant, Giveaway, Ineligible};
use crate::item::ScheduledItem;
use crate::poll::{Poll, VoteChange};
use crate::store::SharedStore;
use chrono::{DateTime, Utc};
use cutie_common::UserId;
use thiserror::Error;
use tracing::debug;

/// Why a giveaway entry was refused.
#[derive(Error, Debug)]
pub enum EntryError {
    /// No giveaway with this id.
    #[error("giveaway {0} not found")]
    NotFound(String),

    /// The giveaway is over.
    #[error("giveaway has ended")]
    Ended,

    /// The user already entered.
    #[error("already entered")]
    AlreadyEntered,

    /// The user fails a requirement.
    #[error("not eligible: {0}")]
    Ineligible(#[from] Ineligible),

    /// The entry was recorded but could not be saved.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Why a vote was refused.
#[derive(Error, Debug)]
pub enum VoteError {
    /// No poll with this id.
    #[error("poll {0} not found")]
    NotFound(String),

    /// The poll is closed.
    #[error("poll has ended")]
    Ended,

    /// The option index is out of range.
    #[error("option {0} does not exist")]
    UnknownOption(usize),

    /// The vote was recorded but could not be saved.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Enters `entrant` into the giveaway `id`. Returns the new entry count.
///
/// # Errors
///
/// See [`EntryError`].
pub async fn enter_giveaway<C>(
    store: &SharedStore<Giveaway>,
    id: &str,
    entrant: &Entrant,
    clock: C,
) -> Result<usize, EntryError>
where
    C: FnOnce() -> DateTime<Utc>,
{
    let mut store = store.lock().await;
    let now = clock();
    let giveaway = store
        .get_mut(id)
        .ok_or_else(|| EntryError::NotFound(id.to_string()))?;

    if giveaway.is_due(now) {
        return Err(EntryError::Ended);
    }
    if giveaway.has_entered(entrant.id) {
        return Err(EntryError::AlreadyEntered);
    }
    giveaway.requirements.check(entrant, now)?;

    giveaway.enter(entrant.id);
    let count = giveaway.entries().len();
    store.save()?;

    debug!("User {} entered giveaway {} ({} entries)", entrant.id, id, count);
    Ok(count)
}

/// Casts `voter`'s vote for option `option_index` of poll `id`, replacing
/// any earlier vote.
///
/// # Errors
///
/// See [`VoteError`].
pub async fn cast_vote<C>(
    store: &SharedStore<Poll>,
    id: &str,
    voter: UserId,
    option_index: usize,
    clock: C,
) -> Result<VoteChange, VoteError>
where
    C: FnOnce() -> DateTime<Utc>,
{
    let mut store = store.lock().await;
    let now = clock();
    let poll = store
        .get_mut(id)
        .ok_or_else(|| VoteError::NotFound(id.to_string()))?;

    if poll.is_due(now) {
        return Err(VoteError::Ended);
    }
    let change = poll
        .vote(voter, option_index)
        .ok_or(VoteError::UnknownOption(option_index))?;
    store.save()?;

    debug!("User {} voted {} in poll {}", voter, change.option, id);
    Ok(change)
}
