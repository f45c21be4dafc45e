//! Localization errors.

use thiserror::Error;

/// Errors raised while building a message bundle.
#[derive(Error, Debug)]
pub enum I18nError {
    /// The locale identifier could not be parsed.
    #[error("Invalid locale identifier: {0}")]
    InvalidLocale(String),

    /// No translations are bundled for the locale.
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// The bundled Fluent resource has syntax errors.
    #[error("Failed to parse {locale} resource: {details}")]
    Parse {
        /// Locale whose resource failed.
        locale: String,
        /// Parser error descriptions.
        details: String,
    },

    /// The resource defines a message twice.
    #[error("Failed to add {locale} resource to bundle: {details}")]
    Bundle {
        /// Locale whose resource failed.
        locale: String,
        /// Bundle error descriptions.
        details: String,
    },
}
