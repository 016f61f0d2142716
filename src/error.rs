/// Error types.
///
/// Only startup can fail in a way the player sees: configuration problems
/// are fatal before a session begins, and terminal I/O errors end the
/// program.  Inside a session nothing is an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems reading character, level or control configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration file is not valid JSON for its schema.
    #[error("malformed {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A control is bound to something other than a single key.
    #[error("control `{control}` must be a single character or `space`, got {value:?}")]
    InvalidKey { control: &'static str, value: String },

    #[error("no level numbered {0}")]
    UnknownLevel(u32),

    #[error("no character named {0:?}")]
    UnknownCharacter(String),

    /// A configuration file parsed but lists nothing.
    #[error("{0} is empty")]
    Empty(&'static str),
}

/// Top-level error for the binary.
#[derive(Error, Debug)]
pub enum GlideError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GlideError>;
