//! Localized message lookup and formatting.

use crate::error::I18nError;
use crate::loader::{Bundle, FluentLoader, DEFAULT_LOCALE};
use fluent_bundle::{FluentArgs, FluentValue};
use tracing::warn;

/// Localized messages for one locale.
pub struct Messages {
    locale: String,
    bundle: Bundle,
}

impl Messages {
    /// Loads the messages for `locale`.
    ///
    /// # Errors
    ///
    /// See [`FluentLoader::load_bundle`].
    pub fn load(locale: &str) -> Result<Self, I18nError> {
        Ok(Self {
            locale: locale.to_string(),
            bundle: FluentLoader::load_bundle(locale)?,
        })
    }

    /// Loads `locale`, or the default locale when it is not available.
    ///
    /// # Errors
    ///
    /// Only fails when the bundled default resource is broken.
    pub fn load_or_default(locale: &str) -> Result<Self, I18nError> {
        Self::load(locale).or_else(|error| {
            warn!("{}, falling back to {}", error, DEFAULT_LOCALE);
            Self::load(DEFAULT_LOCALE)
        })
    }

    /// Locale these messages were loaded for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Gets a message without arguments.
    pub fn get(&self, key: &str) -> String {
        self.render(key, None)
    }

    /// Gets a message, substituting the named arguments.
    pub fn format(&self, key: &str, args: &[(&str, FluentValue<'_>)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, value.clone());
        }
        self.render(key, Some(&fluent_args))
    }

    fn render(&self, key: &str, args: Option<&FluentArgs<'_>>) -> String {
        let Some(pattern) = self.bundle.get_message(key).and_then(|m| m.value()) else {
            warn!("Missing translation for '{}' in {}", key, self.locale);
            return key.to_string();
        };

        let mut errors = Vec::new();
        let text = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!("Errors formatting '{}': {:?}", key, errors);
        }
        text.into_owned()
    }
}

impl std::fmt::Debug for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messages")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
