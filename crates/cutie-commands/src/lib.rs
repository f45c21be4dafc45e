//! # Cutie Commands
//!
//! Discord command implementations using Poise framework for Cutie Bot.
//!
//! This crate provides the slash commands that create reminders, giveaways
//! and polls, the administrator setup commands, and the routing of button
//! presses to giveaway entries and poll votes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod botinfo;
pub mod checks;
pub mod embeds;
pub mod framework;
pub mod giveaway;
pub mod ids;
pub mod interactions;
pub mod poll;
pub mod remind;

pub use framework::*;
