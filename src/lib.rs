//! # run-macro
//!
//! Launcher for an editor's macro runner: resolves a file and a list of macro
//! names from the command line and hands them to the configured runner.

pub mod cli;
pub mod config;
pub mod error;
pub mod invocation;
pub mod runner;

pub use error::{Error, Result};
pub use invocation::Invocation;
pub use runner::{Completion, LaunchMode, MacroRunner, ProcessRunner};

/// Print an error and exit with its status code.
pub fn fatal_error(error: &Error) -> ! {
    eprintln!("Error: {error}");
    std::process::exit(error.exit_code());
}
