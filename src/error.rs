//! Crate error type and `Result` alias.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read config file '{}': {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid --macros value '{value}': {reason}")]
    InvalidMacroList { value: String, reason: String },

    #[error("Macro name is not valid UTF-8: '{value}'")]
    NonUtf8Macro { value: String },

    #[error(
        "No macro runner configured. Pass --runner, set RUN_MACRO_RUNNER, or add [runner] program to .runmacro.toml."
    )]
    NoRunner,

    #[error("Macro runner '{program}' not found: {source}")]
    RunnerNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("No file given for the macro runner")]
    MissingFile,

    #[error("Macro runner failed with {}", describe_code(*code))]
    RunnerFailed { code: Option<i32> },
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

impl Error {
    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidMacroList { .. } | Self::NonUtf8Macro { .. } => 2,
            Self::RunnerFailed { code: Some(code) } if *code != 0 => *code,
            _ => 1,
        }
    }
}
