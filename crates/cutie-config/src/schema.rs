//! Configuration schema definitions using serde.

use cutie_common::{ChannelId, GuildId, RoleId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Cutie Bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// General bot behaviour.
    pub bot: BotConfig,
    /// Where scheduled records are persisted.
    pub storage: StorageConfig,
    /// Dispatcher loop configuration.
    pub scheduler: SchedulerConfig,
    /// Reminder limits.
    pub reminders: ReminderConfig,
    /// Giveaway limits and permissions.
    pub giveaways: GiveawayConfig,
    /// Poll channel, permissions and limits.
    pub polls: PollConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: String,
    /// Register slash commands in this guild only instead of globally.
    pub guild_id: Option<GuildId>,
}

/// General bot behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Locale used for user-facing messages.
    pub language: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the record files.
    pub data_dir: PathBuf,
    /// Reminder records file name.
    pub reminders_file: String,
    /// Giveaway records file name.
    pub giveaways_file: String,
    /// Poll records file name.
    pub polls_file: String,
}

impl StorageConfig {
    /// Full path of the reminder records file.
    pub fn reminders_path(&self) -> PathBuf {
        self.data_dir.join(&self.reminders_file)
    }

    /// Full path of the giveaway records file.
    pub fn giveaways_path(&self) -> PathBuf {
        self.data_dir.join(&self.giveaways_file)
    }

    /// Full path of the poll records file.
    pub fn polls_path(&self) -> PathBuf {
        self.data_dir.join(&self.polls_file)
    }
}

/// Dispatcher loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between two scans of a store.
    pub check_interval_seconds: u64,
}

/// Reminder limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Longest accepted reminder delay in days.
    pub max_duration_days: u32,
}

/// Giveaway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GiveawayConfig {
    /// Role required to create giveaways. Anyone may when unset.
    pub manager_role_id: Option<RoleId>,
    /// Highest accepted winner count.
    pub max_winners: u32,
    /// Longest accepted giveaway in hours.
    pub max_duration_hours: u32,
    /// Embed colour used when none is given.
    pub default_color: u32,
}

/// Poll configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Channel polls are posted in.
    pub channel_id: Option<ChannelId>,
    /// Role pinged when a poll is posted.
    pub ping_role_id: Option<RoleId>,
    /// Role required to create polls. Anyone may when unset.
    pub manager_role_id: Option<RoleId>,
    /// Fewest options a poll may have.
    pub min_options: usize,
    /// Most options a poll may have.
    pub max_options: usize,
    /// Longest accepted poll in hours.
    pub max_duration_hours: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human readable output.
    pub json: bool,
    /// Write a daily rolling log file into this directory.
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns every problem found, joined into one configuration error.
    pub fn validate(&self) -> Result<(), cutie_common::CutieError> {
        crate::validator::ConfigValidator::check(self)
    }
}
