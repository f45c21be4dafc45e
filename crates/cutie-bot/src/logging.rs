//! Structured logging setup.

use crate::error::{BotError, BotResult};
use cutie_config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix of the rolling log files.
pub const LOG_FILE_PREFIX: &str = "cutie-bot.log";

/// Filter from `RUST_LOG`, else from the configured level.
///
/// # Errors
///
/// Returns an error when the configured level is not a valid directive.
pub fn build_filter(level: &str) -> BotResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| BotError::Logging(format!("invalid log level `{level}`: {e}")))
}

/// Installs the global subscriber.
///
/// Console output is compact text, or JSON lines when `json` is set. With a
/// `directory` the same events also go to a daily rolling file through a
/// non-blocking writer; keep the returned guard alive until exit so buffered
/// lines are flushed.
///
/// # Errors
///
/// Returns an error for an invalid level or when a subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig) -> BotResult<Option<WorkerGuard>> {
    let filter = build_filter(&config.level)?;

    let (file_writer, guard) = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let json_layer = config.json.then(|| fmt::layer().json());
    let text_layer = (!config.json).then(|| fmt::layer().compact());
    let file_layer = file_writer.map(|writer| fmt::layer().with_ansi(false).with_writer(writer));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| BotError::Logging(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directives_parse() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("cutie_scheduling=debug,warn").is_ok());
    }
}
