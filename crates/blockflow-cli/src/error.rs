use std::{io, ops::Range, path::PathBuf};

use thiserror::Error;

use blockflow::BlockflowError;

use crate::config::ConfigError;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Blockflow(#[from] BlockflowError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid scene file `{path}`: {message}")]
    SceneFile {
        path: PathBuf,
        message: String,
        /// Byte range of the offending TOML, when known
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
