//! Routing of button presses to giveaway entries and poll votes.

use crate::framework::{Data, Error};
use crate::ids;
use chrono::{DateTime, Utc};
use cutie_i18n::Messages;
use cutie_scheduling::{
    cast_vote, enter_giveaway, ComponentAction, Entrant, EntryError, Ineligible, VoteChange,
    VoteError,
};
use poise::serenity_prelude as serenity;
use tracing::{debug, error};

/// Reply to a giveaway entry attempt.
pub fn entry_reply(messages: &Messages, result: &Result<usize, EntryError>) -> String {
    let key = match result {
        Ok(_) => "giveaway-entered",
        Err(EntryError::NotFound(_)) => "giveaway-error-not-found",
        Err(EntryError::Ended) => "giveaway-error-ended",
        Err(EntryError::AlreadyEntered) => "giveaway-error-already-entered",
        Err(EntryError::Ineligible(Ineligible::MissingRequiredRole(_))) => {
            "giveaway-error-required-role"
        }
        Err(EntryError::Ineligible(Ineligible::AccountTooYoung { min_days })) => {
            return messages.format(
                "giveaway-error-account-age",
                &[("days", (*min_days).into())],
            );
        }
        Err(EntryError::Ineligible(Ineligible::NotInAllowedRoles)) => {
            "giveaway-error-allowed-roles"
        }
        Err(EntryError::Ineligible(Ineligible::ExcludedRole(_))) => "giveaway-error-excluded-role",
        Err(EntryError::Storage(_)) => "error-storage",
    };
    messages.get(key)
}

/// Reply to a vote attempt.
pub fn vote_reply(messages: &Messages, result: &Result<VoteChange, VoteError>) -> String {
    match result {
        Ok(VoteChange {
            option,
            previous: Some(previous),
        }) if previous != option => messages.format(
            "poll-vote-changed",
            &[
                ("previous", previous.as_str().into()),
                ("option", option.as_str().into()),
            ],
        ),
        Ok(change) => messages.format("poll-voted", &[("option", change.option.as_str().into())]),
        Err(VoteError::NotFound(_)) => messages.get("poll-error-not-found"),
        Err(VoteError::Ended) => messages.get("poll-error-ended"),
        Err(VoteError::UnknownOption(_)) => messages.get("poll-error-unknown-option"),
        Err(VoteError::Storage(_)) => messages.get("error-storage"),
    }
}

/// The presser of a component as a giveaway entrant.
pub fn entrant_of(component: &serenity::ComponentInteraction, now: DateTime<Utc>) -> Entrant {
    let roles = component
        .member
        .as_ref()
        .map(|member| member.roles.iter().copied().map(ids::role_of).collect())
        .unwrap_or_default();
    let account_created_at =
        DateTime::from_timestamp(component.user.id.created_at().unix_timestamp(), 0)
            .unwrap_or(now);

    Entrant {
        id: ids::user_of(component.user.id),
        roles,
        account_created_at,
    }
}

/// Handles a component interaction, ignoring ids that are not ours.
///
/// # Errors
///
/// Returns the Discord error if the reply cannot be sent.
pub async fn handle_component(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    let action: ComponentAction = match component.data.custom_id.parse() {
        Ok(action) => action,
        Err(e) => {
            debug!("Ignoring component: {}", e);
            return Ok(());
        }
    };
    let reply = match action {
        ComponentAction::EnterGiveaway { giveaway_id } => {
            let entrant = entrant_of(component, Utc::now());
            let result = enter_giveaway(&data.giveaways, &giveaway_id, &entrant, Utc::now).await;
            if let Err(EntryError::Storage(e)) = &result {
                error!("Failed to save entry into giveaway {}: {}", giveaway_id, e);
            }
            entry_reply(&data.messages, &result)
        }
        ComponentAction::Vote { poll_id, option } => {
            let voter = ids::user_of(component.user.id);
            let result = cast_vote(&data.polls, &poll_id, voter, option, Utc::now).await;
            if let Err(VoteError::Storage(e)) = &result {
                error!("Failed to save vote in poll {}: {}", poll_id, e);
            }
            vote_reply(&data.messages, &result)
        }
    };

    component
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(reply)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutie_common::RoleId;

    fn messages() -> Messages {
        Messages::load("en-US").unwrap()
    }

    #[test]
    fn test_entry_replies() {
        let messages = messages();
        assert_eq!(
            entry_reply(&messages, &Ok(3)),
            "You have entered the giveaway! Good luck! 🎉"
        );
        assert_eq!(
            entry_reply(&messages, &Err(EntryError::AlreadyEntered)),
            "You have already entered this giveaway!"
        );
        assert_eq!(
            entry_reply(
                &messages,
                &Err(Ineligible::AccountTooYoung { min_days: 7 }.into())
            ),
            "Your account must be at least 7 days old to enter!"
        );
        assert_eq!(
            entry_reply(&messages, &Err(Ineligible::ExcludedRole(RoleId(1)).into())),
            "You have a role that is excluded from this giveaway!"
        );
    }

    #[test]
    fn test_vote_replies() {
        let messages = messages();
        let first = VoteChange {
            option: "Yes".to_string(),
            previous: None,
        };
        assert_eq!(vote_reply(&messages, &Ok(first)), "You voted for: Yes");

        let moved = VoteChange {
            option: "No".to_string(),
            previous: Some("Yes".to_string()),
        };
        assert_eq!(
            vote_reply(&messages, &Ok(moved)),
            "You changed your vote from Yes to No."
        );

        let same = VoteChange {
            option: "No".to_string(),
            previous: Some("No".to_string()),
        };
        assert_eq!(vote_reply(&messages, &Ok(same)), "You voted for: No");
        assert_eq!(
            vote_reply(&messages, &Err(VoteError::Ended)),
            "This poll has already ended."
        );
    }
}
