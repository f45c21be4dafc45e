//! # Cutie I18n
//!
//! Internationalization support using Fluent localization system for Cutie Bot.
//!
//! Translations are embedded at compile time and parsed once per locale when
//! the bot starts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod loader;
pub mod messages;

pub use error::*;
pub use loader::*;
pub use messages::*;

pub use fluent_bundle::FluentValue;
