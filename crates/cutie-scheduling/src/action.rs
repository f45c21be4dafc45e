//! Button actions encoded in component custom ids.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a button press asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentAction {
    /// Enter a giveaway. Encoded as `giveaway:<id>:enter`.
    EnterGiveaway {
        /// Giveaway store key.
        giveaway_id: String,
    },
    /// Vote in a poll. Encoded as `poll:<id>:vote:<option index>`.
    Vote {
        /// Poll store key.
        poll_id: String,
        /// Index into the poll's options.
        option: usize,
    },
}

/// A custom id that is not a known action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised component id `{0}`")]
pub struct ActionParseError(pub String);

impl fmt::Display for ComponentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnterGiveaway { giveaway_id } => write!(f, "giveaway:{giveaway_id}:enter"),
            Self::Vote { poll_id, option } => write!(f, "poll:{poll_id}:vote:{option}"),
        }
    }
}

impl FromStr for ComponentAction {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let action = match parts.as_slice() {
            ["giveaway", id, "enter"] if !id.is_empty() => Some(Self::EnterGiveaway {
                giveaway_id: (*id).to_string(),
            }),
            ["poll", id, "vote", index] if !id.is_empty() => {
                index.parse().ok().map(|option| Self::Vote {
                    poll_id: (*id).to_string(),
                    option,
                })
            }
            _ => None,
        };

        action.ok_or_else(|| ActionParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding() {
        let enter = ComponentAction::EnterGiveaway {
            giveaway_id: "123".to_string(),
        };
        assert_eq!(enter.to_string(), "giveaway:123:enter");

        let vote = ComponentAction::Vote {
            poll_id: "456".to_string(),
            option: 2,
        };
        assert_eq!(vote.to_string(), "poll:456:vote:2");
        assert_eq!("poll:456:vote:2".parse::<ComponentAction>(), Ok(vote));
        assert_eq!("giveaway:123:enter".parse::<ComponentAction>(), Ok(enter));
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        for id in [
            "",
            "enter_giveaway",
            "poll_Yes",
            "giveaway::enter",
            "poll:1:vote:x",
            "poll:1:vote:-1",
            "giveaway:1:enter:extra",
        ] {
            assert!(id.parse::<ComponentAction>().is_err(), "{id}");
        }
    }
}
