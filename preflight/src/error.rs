use std::io;
use std::path::PathBuf;

use nexus::block::mrbayes::Switch;
use nexus::parser::ParseError;
use thiserror::Error;

/// Reasons a build step aborts. Each message names the file and the cause on one line.
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("{0}")]
    Configuration(String),

    #[error("cannot read NEXUS file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse NEXUS file {}: {message}", path.display())]
    Parse {
        path: PathBuf,
        /// The first error, with line and column.
        message: String,
        /// Every error found, for rendering against `text`.
        diagnostics: Vec<ParseError>,
        text: String,
    },

    #[error("{}: no mrbayes block found", path.display())]
    MissingBlock { path: PathBuf },

    #[error(
        "{}: mrbayes block does not set autoclose=yes (autoclose is {setting}), MrBayes would wait for input",
        path.display()
    )]
    AutocloseDisabled { path: PathBuf, setting: Switch },

    #[error("cannot start {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write to build log: {0}")]
    Log(#[from] io::Error),
}

impl PreflightError {
    pub fn unknown_installation(name: &str) -> Self {
        PreflightError::Configuration(format!("unknown MrBayes installation '{}'", name))
    }

    pub fn blank_field(field: &str) -> Self {
        PreflightError::Configuration(format!("{} must not be blank", field))
    }
}
