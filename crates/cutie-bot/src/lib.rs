//! # Cutie Bot
//!
//! Discord bot for reminders, giveaways and polls.
//!
//! This is the main binary crate that loads the configuration and the
//! record stores, starts one dispatcher per kind of scheduled item and runs
//! the Poise framework until shutdown.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod announcer;
pub mod bot;
pub mod error;
pub mod logging;

pub use announcer::*;
pub use bot::*;
pub use error::*;
pub use logging::*;
