//! Thread-safe configuration caching with arc-swap for lock-free reads.

use crate::schema::Config;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Thread-safe configuration cache using arc-swap for lock-free reads.
pub struct ConfigCache {
    config: ArcSwap<Config>,
}

impl ConfigCache {
    /// Creates a new configuration cache with the given initial configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
        }
    }

    /// Gets the current configuration.
    pub fn get(&self) -> Arc<Config> {
        self.config.load_full()
    }

    /// Applies `edit` to a copy of the current configuration, stores it and
    /// returns the value that was stored.
    ///
    /// `edit` may run more than once when another writer races this one.
    pub fn modify<F>(&self, edit: F) -> Arc<Config>
    where
        F: Fn(&mut Config),
    {
        let mut stored = None;
        self.config.rcu(|current| {
            let mut next = Config::clone(current);
            edit(&mut next);
            let next = Arc::new(next);
            stored = Some(Arc::clone(&next));
            next
        });
        stored.unwrap_or_else(|| self.get())
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
