//! Runtime validation of a loaded configuration.

use crate::defaults::MAX_POLL_OPTIONS;
use crate::schema::Config;
use cutie_common::{CutieError, Result};

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns the configuration error produced by [`ConfigValidator::check`].
    pub fn validate(config: &Config) -> Result<()> {
        Self::check(config).map_err(Into::into)
    }

    /// Collects every problem with `config` into a single error.
    ///
    /// # Errors
    ///
    /// Returns [`CutieError::Config`] listing all problems found.
    pub fn check(config: &Config) -> std::result::Result<(), CutieError> {
        let problems = Self::problems(config);

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CutieError::Config(problems.join("; ")))
        }
    }

    /// Lists the problems with `config`, empty when it is valid.
    pub fn problems(config: &Config) -> Vec<String> {
        let mut problems = Vec::new();

        if config.discord.token.trim().is_empty() {
            problems.push("Discord token cannot be empty".to_string());
        }

        if config.bot.language.trim().is_empty() {
            problems.push("bot.language cannot be empty".to_string());
        }

        if config.scheduler.check_interval_seconds == 0 {
            problems.push("scheduler.check_interval_seconds must be at least 1".to_string());
        }

        if config.reminders.max_duration_days == 0 {
            problems.push("reminders.max_duration_days must be at least 1".to_string());
        }

        if config.giveaways.max_winners == 0 {
            problems.push("giveaways.max_winners must be at least 1".to_string());
        }

        if config.giveaways.max_duration_hours == 0 {
            problems.push("giveaways.max_duration_hours must be at least 1".to_string());
        }

        if config.giveaways.default_color > 0xFF_FFFF {
            problems.push("giveaways.default_color must be a 24-bit colour".to_string());
        }

        let polls = &config.polls;
        if polls.min_options < 2 {
            problems.push("polls.min_options must be at least 2".to_string());
        }
        if polls.max_options > MAX_POLL_OPTIONS {
            problems.push(format!("polls.max_options cannot exceed {MAX_POLL_OPTIONS}"));
        }
        if polls.min_options > polls.max_options {
            problems.push("polls.min_options cannot exceed polls.max_options".to_string());
        }
        if polls.max_duration_hours == 0 {
            problems.push("polls.max_duration_hours must be at least 1".to_string());
        }

        problems
    }
}
