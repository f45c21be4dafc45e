//! Configuration loading and persistence with atomic file operations.

use crate::schema::Config;
use cutie_common::CutieError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result type of the loader, whose errors are all [`CutieError`] values.
type Result<T> = std::result::Result<T, CutieError>;

/// Environment variable overriding `discord.token`.
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "CUTIE_LOG_LEVEL";

/// Configuration loader with atomic file operations.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads configuration from file and applies environment overrides.
    ///
    /// A missing file yields the defaults so a token-only environment setup
    /// works.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        let mut config = self.read_file()?;
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads the file as written, without any override.
    fn read_file(&self) -> Result<Config> {
        if !self.path.exists() {
            info!(
                "No configuration file at {}, using defaults",
                self.path.display()
            );
            return Ok(Config::default());
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let config = Self::parse(&raw)?;
        info!("Loaded configuration from {}", self.path.display());
        Ok(config)
    }

    /// Applies `edit` to the configuration file and saves it.
    ///
    /// The edit works on the file contents, so environment and command line
    /// overrides held by the running bot never reach the disk. A missing file
    /// starts from the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, parsed or replaced.
    pub fn update_file<F>(&self, edit: F) -> Result<Config>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.read_file()?;
        edit(&mut config);
        self.save(&config)?;
        Ok(config)
    }

    /// Parses a TOML document into a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CutieError::Config`] when the document is not valid TOML or
    /// does not match the schema.
    pub fn parse(raw: &str) -> std::result::Result<Config, CutieError> {
        toml::from_str(raw).map_err(|e| CutieError::Config(e.to_string()))
    }

    /// Applies overrides looked up through `lookup`.
    pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            debug!("Using Discord token from {}", TOKEN_ENV);
            config.discord.token = token;
        }

        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|l| !l.trim().is_empty()) {
            config.logging.level = level;
        }
    }

    /// Saves configuration to file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails or the file cannot be
    /// replaced.
    pub fn save(&self, config: &Config) -> Result<()> {
        let raw = toml::to_string_pretty(config)
            .map_err(|e| CutieError::Serialization(e.to_string()))?;

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&directory)?;

        let mut file = tempfile::NamedTempFile::new_in(&directory)?;
        file.write_all(raw.as_bytes())?;
        file.persist(&self.path)
            .map_err(|e| CutieError::Io(e.error))?;

        info!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}
