//! CLI module containing the main entry point logic.
//!
//! Kept out of main.rs so the launcher can be driven from tests.

use crate::config::{self, RUNNER_ENV_VAR};
use crate::error::{Error, Result};
use crate::invocation::{Invocation, RawOptions};
use crate::runner::{Completion, LaunchMode, MacroRunner, ProcessRunner};
use clap::Parser as ClapParser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI arguments for the run-macro launcher.
#[derive(ClapParser, Debug)]
#[command(name = "run-macro")]
#[command(version = PKG_VERSION)]
#[command(about = "Run editor macros from a file", long_about = None)]
pub struct Cli {
    /// File followed by macro names (`run-macro notes.md tidy wrap`)
    #[arg(value_name = "FILE_AND_MACROS")]
    positionals: Vec<OsString>,

    /// File containing the macros (takes precedence over the first positional)
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Macro names; takes every value up to the next flag, repeatable, and
    /// each value may be a JSON array like '["a","b"]'
    #[arg(long, value_name = "LIST", num_args = 1..)]
    macros: Option<Vec<String>>,

    /// A single macro name (ignored when --macros is given)
    #[arg(long = "macro", value_name = "NAME")]
    single_macro: Option<String>,

    /// Runner program (overrides RUN_MACRO_RUNNER and the config file)
    #[arg(long, value_name = "PROGRAM")]
    runner: Option<String>,

    /// Config file, or a directory containing .runmacro.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start the runner and exit without waiting for it
    #[arg(long)]
    detach: bool,

    /// Print the resolved invocation as JSON instead of running it
    #[arg(long)]
    inspect: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Resolve the invocation against `cwd`.
    ///
    /// # Errors
    ///
    /// Fails when a `--macros` value is a malformed JSON array.
    pub fn invocation(&self, cwd: &Path) -> Result<Invocation> {
        let options = RawOptions {
            file: self.file.clone(),
            macros: self.macros.clone(),
            single_macro: self.single_macro.clone(),
            positionals: self.positionals.clone(),
        };
        Invocation::resolve(options, cwd)
    }
}

/// Hand the invocation to the runner, macro names as individual arguments.
///
/// # Errors
///
/// Whatever the runner reports.
pub fn launch(
    invocation: &Invocation,
    runner: &impl MacroRunner,
    mode: LaunchMode,
) -> Result<Completion> {
    runner.run(invocation.file.as_deref(), &invocation.macros, mode)
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn execute(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let invocation = cli.invocation(&cwd)?;
    debug!(?invocation, "resolved invocation");

    if cli.inspect {
        println!("{}", invocation.to_json()?);
        return Ok(());
    }

    let config = config::load_config(cli.config.as_deref())?;
    let program = config
        .runner_program(cli.runner.as_deref(), std::env::var(RUNNER_ENV_VAR).ok())
        .ok_or(Error::NoRunner)?;
    let runner = ProcessRunner::new(&program, config.runner.args.clone())?;

    let mode = if cli.detach || config.runner.detach {
        LaunchMode::Detach
    } else {
        LaunchMode::Await
    };

    match launch(&invocation, &runner, mode)? {
        Completion::Finished => info!("macro runner finished"),
        Completion::Detached(pid) => info!(pid, "macro runner detached"),
    }
    Ok(())
}

/// Main CLI logic: parse arguments, launch, and exit with the outcome.
pub fn run_cli() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = execute(&cli) {
        crate::fatal_error(&e);
    }
}
