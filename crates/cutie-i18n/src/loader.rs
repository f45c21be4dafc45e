//! Fluent resource loading from the translations embedded in the binary.

use crate::error::I18nError;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentResource;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;
use unic_langid::LanguageIdentifier;

/// Locale used when the configured one is not bundled.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Bundled Fluent sources keyed by locale.
static RESOURCES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([(DEFAULT_LOCALE, include_str!("../locales/en-US/main.ftl"))])
});

/// A thread-safe Fluent bundle.
pub type Bundle = FluentBundle<FluentResource>;

/// Fluent bundle loader.
pub struct FluentLoader;

impl FluentLoader {
    /// Locales with bundled translations, sorted.
    pub fn available_locales() -> Vec<&'static str> {
        let mut locales: Vec<_> = RESOURCES.keys().copied().collect();
        locales.sort_unstable();
        locales
    }

    /// Builds the bundle for `locale`.
    ///
    /// # Errors
    ///
    /// Fails when the locale is malformed or not bundled, or when its
    /// resource does not parse.
    pub fn load_bundle(locale: &str) -> Result<Bundle, I18nError> {
        let langid: LanguageIdentifier = locale
            .parse()
            .map_err(|_| I18nError::InvalidLocale(locale.to_string()))?;

        let source = RESOURCES
            .get(langid.to_string().as_str())
            .ok_or_else(|| I18nError::UnsupportedLocale(locale.to_string()))?;

        let resource = FluentResource::try_new((*source).to_string()).map_err(|(_, errors)| {
            I18nError::Parse {
                locale: locale.to_string(),
                details: join_errors(&errors),
            }
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![langid]);
        // Unicode isolation marks show up literally in Discord messages.
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| I18nError::Bundle {
                locale: locale.to_string(),
                details: join_errors(&errors),
            })?;

        debug!("Loaded Fluent bundle for {}", locale);
        Ok(bundle)
    }
}

fn join_errors<E: std::fmt::Debug>(errors: &[E]) -> String {
    errors
        .iter()
        .map(|e| format!("{e:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}
