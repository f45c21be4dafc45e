//! Main entry point for Cutie Bot.

use clap::Parser;
use cutie_bot::{init_logging, BotResult, CutieBot};
use cutie_config::ConfigLoader;
use cutie_i18n::Messages;
use std::path::PathBuf;
use tracing::{error, info};

/// Discord bot for reminders, giveaways and polls.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Log filter, overriding the configuration file.
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> BotResult<()> {
    let args = Args::parse();

    let loader = ConfigLoader::new(args.config);
    let mut config = loader.load()?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    let _guard = init_logging(&config.logging)?;
    info!(
        "Starting Cutie Bot v{} with {}",
        env!("CARGO_PKG_VERSION"),
        loader.path().display()
    );

    config.validate()?;
    let messages = Messages::load_or_default(&config.bot.language)?;

    let bot = CutieBot::new(config, loader, messages);
    if let Err(e) = bot.start().await {
        error!("Bot stopped with an error: {}", e);
        return Err(e);
    }

    Ok(())
}
