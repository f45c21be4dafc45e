//! Default values for every configuration section.

use crate::schema::*;
use std::path::PathBuf;

/// Action rows hold at most five buttons, one per poll option.
pub const MAX_POLL_OPTIONS: usize = 5;

/// Embed colour of giveaways created without one.
pub const DEFAULT_GIVEAWAY_COLOR: u32 = 0x2F_3136;

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            guild_id: None,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            reminders_file: "reminders.json".to_string(),
            giveaways_file: "giveaways.json".to_string(),
            polls_file: "polls.json".to_string(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            check_interval_seconds: 60,
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            max_duration_days: 365,
        }
    }
}

impl Default for GiveawayConfig {
    fn default() -> Self {
        Self {
            manager_role_id: None,
            max_winners: 10,
            max_duration_hours: 168,
            default_color: DEFAULT_GIVEAWAY_COLOR,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            channel_id: None,
            ping_role_id: None,
            manager_role_id: None,
            min_options: 2,
            max_options: MAX_POLL_OPTIONS,
            max_duration_hours: 168,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            directory: None,
        }
    }
}
