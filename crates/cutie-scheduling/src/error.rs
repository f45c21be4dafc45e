//! Error types for record storage and item construction.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing a record store to disk.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Creating the directory or the temporary file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The records could not be encoded.
    #[error("Failed to serialize records: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The temporary file could not replace the store file.
    #[error("Failed to replace {}: {source}", path.display())]
    Persist {
        /// Store file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Errors raised when an item is built from user input or from a stored
/// record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// A required text field is blank.
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// A giveaway must draw at least one winner.
    #[error("a giveaway needs at least one winner")]
    NoWinners,

    /// The option list is too short or too long.
    #[error("expected between {min} and {max} options, got {found}")]
    OptionCount {
        /// Fewest accepted options.
        min: usize,
        /// Most accepted options.
        max: usize,
        /// Options supplied.
        found: usize,
    },

    /// Two options share a label.
    #[error("duplicate option `{0}`")]
    DuplicateOption(String),
}
