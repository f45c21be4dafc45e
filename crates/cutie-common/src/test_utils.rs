//! Test utilities and shared test helpers for Cutie Bot.
//!
//! Fixtures and helpers used by the unit and integration tests of every crate
//! in the workspace. Enabled with the `testing` feature.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Once;

#[cfg(feature = "tracing-subscriber")]
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call multiple times.
#[cfg(feature = "tracing-subscriber")]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// No-op version when tracing-subscriber is not available
#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_test_logging() {
    INIT.call_once(|| {});
}

/// Test fixture for creating a fixed timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Discord-related test utilities.
pub mod discord_fixtures {
    use crate::{ChannelId, UserId};

    /// Create a test channel ID.
    pub fn test_channel_id() -> ChannelId {
        ChannelId(123_456_789_012_345_678)
    }

    /// Create a test user ID.
    pub fn test_user_id() -> UserId {
        UserId(987_654_321_098_765_432)
    }

    /// Create multiple test user IDs.
    pub fn test_user_ids(count: usize) -> Vec<UserId> {
        (0..count as u64)
            .map(|i| UserId(100_000_000_000_000_000 + i))
            .collect()
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// A minimal valid configuration file.
    pub fn minimal_config_toml() -> &'static str {
        r#"
[discord]
token = "test_token"
"#
    }

    /// A configuration file that sets every section.
    pub fn full_config_toml() -> &'static str {
        r#"
[discord]
token = "test_token_full"
guild_id = 555555555555555555

[bot]
language = "en-US"

[storage]
data_dir = "state"
reminders_file = "reminders.json"
giveaways_file = "giveaways.json"
polls_file = "polls.json"

[scheduler]
check_interval_seconds = 30

[reminders]
max_duration_days = 30

[giveaways]
manager_role_id = 1317607057687576696
max_winners = 5
max_duration_hours = 72
default_color = 3092790

[polls]
channel_id = 1368282389608140822
ping_role_id = 1368596260340240514
manager_role_id = 1317606142523998258
min_options = 2
max_options = 4
max_duration_hours = 48

[logging]
level = "debug"
json = true
"#
    }
}
