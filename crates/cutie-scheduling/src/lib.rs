//! # Cutie Scheduling
//!
//! Durable, time-keyed reminders, giveaways and polls.
//!
//! Every kind of item lives in its own JSON-backed [`RecordStore`]. Slash
//! commands add items, button presses mutate participant state through the
//! [`participation`] functions, and one [`Dispatcher`] per kind wakes on a
//! fixed interval to deliver each due item exactly once before removing it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod dispatcher;
pub mod error;
pub mod giveaway;
pub mod item;
pub mod participation;
pub mod poll;
pub mod reminder;
pub mod store;

pub use action::*;
pub use dispatcher::*;
pub use error::*;
pub use giveaway::*;
pub use item::*;
pub use participation::*;
pub use poll::*;
pub use reminder::*;
pub use store::*;
