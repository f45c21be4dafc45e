//! # Cutie Common
//!
//! Shared types, utilities, and common functionality for Cutie Bot.
//!
//! This crate provides the foundational id newtypes, the application error
//! type, and the small parsing helpers used by every other crate in the
//! workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod timestamp;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use types::*;
pub use utils::*;
