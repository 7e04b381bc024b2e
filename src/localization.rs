//! Message catalog for every user-facing string the bot sends.
//!
//! Texts live in a Fluent resource compiled into the binary, so the bot does
//! not depend on the working directory it is started from.

use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentResource;
use std::sync::LazyLock;
use unic_langid::LanguageIdentifier;

/// Locale of the shipped catalog
pub const DEFAULT_LOCALE: &str = "ru";

const MAIN_RESOURCE: &str = include_str!("../locales/ru/main.ftl");

/// Localization manager for the buyer bot
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl LocalizationManager {
    /// Create a new localization manager from the embedded catalog
    pub fn new() -> Result<Self> {
        Self::from_source(DEFAULT_LOCALE, MAIN_RESOURCE)
    }

    /// Create a manager from an arbitrary Fluent source
    pub fn from_source(locale: &str, source: &str) -> Result<Self> {
        let locale: LanguageIdentifier = locale.parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Telegram renders the isolation marks as visible garbage in some clients
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("invalid Fluent resource: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("duplicate Fluent messages: {errors:?}"))?;

        Ok(Self { bundle })
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut errors = vec![];
        let value = self.bundle.format_pattern(pattern, None, &mut errors);
        if !errors.is_empty() {
            tracing::warn!(key, ?errors, "Fluent formatting reported errors");
        }

        value.into_owned()
    }

    /// Whether the catalog defines `key`
    pub fn has_message(&self, key: &str) -> bool {
        self.bundle.has_message(key)
    }
}

static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(|| {
    LocalizationManager::new().unwrap_or_else(|e| panic!("embedded catalog is invalid: {e}"))
});

/// Force the catalog to load, surfacing a broken resource at startup
pub fn init_localization() -> Result<()> {
    LocalizationManager::new()?;
    LazyLock::force(&LOCALIZATION_MANAGER);
    Ok(())
}

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Convenience function to get a localized message
pub fn t(key: &str) -> String {
    get_localization_manager().get_message(key)
}
