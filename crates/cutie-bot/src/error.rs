//! Application-wide error types using thiserror.

use cutie_common::CutieError;
use cutie_i18n::I18nError;
use poise::serenity_prelude as serenity;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Error raised by a shared crate.
    #[error(transparent)]
    Common(#[from] CutieError),

    /// Localization error.
    #[error("Localization error: {0}")]
    I18n(#[from] I18nError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// The tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
