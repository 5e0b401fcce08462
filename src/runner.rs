//! The boundary to whatever actually executes macros.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Template token replaced by the file path.
pub const FILE_PLACEHOLDER: &str = "{file}";
/// Template token expanded to one argument per macro name.
pub const MACROS_PLACEHOLDER: &str = "{macros}";

/// Whether the launcher waits for the runner to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchMode {
    #[default]
    Await,
    Detach,
}

/// What the runner reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The runner ran to completion successfully.
    Finished,
    /// The runner was started and left running, with its process id.
    Detached(u32),
}

/// Executes the named macros against a file.
///
/// The launcher does not validate its inputs: `file` may be `None` and
/// `macros` may be empty. Rejecting those is up to the implementation.
pub trait MacroRunner {
    /// # Errors
    ///
    /// Implementations return an error when the macros could not be run.
    fn run(&self, file: Option<&Path>, macros: &[String], mode: LaunchMode) -> Result<Completion>;
}

/// Runs macros by spawning an external program.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessRunner {
    /// Build a runner for `program`, resolving it on `PATH` when it is a bare name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunnerNotFound`] when the program cannot be located.
    pub fn new(program: &str, args: Vec<String>) -> Result<Self> {
        let program = which::which(program).map_err(|source| Error::RunnerNotFound {
            program: program.to_string(),
            source,
        })?;
        debug!(program = %program.display(), "resolved macro runner");
        Ok(Self { program, args })
    }

    /// Expand the argument template for one invocation.
    #[must_use]
    pub fn command_args(&self, file: &Path, macros: &[String]) -> Vec<OsString> {
        expand_template(&self.args, file, macros)
    }
}

impl MacroRunner for ProcessRunner {
    fn run(&self, file: Option<&Path>, macros: &[String], mode: LaunchMode) -> Result<Completion> {
        let file = file.ok_or(Error::MissingFile)?;
        let args = self.command_args(file, macros);

        let mut cmd = Command::new(&self.program);
        cmd.args(&args);
        info!(program = %self.program.display(), ?args, ?mode, "starting macro runner");

        match mode {
            LaunchMode::Await => {
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()?;

                if status.success() {
                    Ok(Completion::Finished)
                } else {
                    Err(Error::RunnerFailed {
                        code: status.code(),
                    })
                }
            }
            LaunchMode::Detach => {
                // Not waited on: the runner outlives the launcher.
                #[allow(clippy::zombie_processes)]
                let child = cmd.stdin(Stdio::null()).spawn()?;
                Ok(Completion::Detached(child.id()))
            }
        }
    }
}

/// Substitute `{file}` and expand `{macros}`; append both when neither appears.
///
/// The file is spliced in as an `OsStr`, so non-UTF-8 paths reach the runner unchanged.
#[must_use]
pub fn expand_template(template: &[String], file: &Path, macros: &[String]) -> Vec<OsString> {
    let has_placeholder = template
        .iter()
        .any(|arg| arg.contains(FILE_PLACEHOLDER) || arg == MACROS_PLACEHOLDER);

    if !has_placeholder {
        let mut args: Vec<OsString> = template.iter().map(OsString::from).collect();
        args.push(file.as_os_str().to_os_string());
        args.extend(macros.iter().map(OsString::from));
        return args;
    }

    let mut args = Vec::with_capacity(template.len() + macros.len());
    for arg in template {
        if arg == MACROS_PLACEHOLDER {
            args.extend(macros.iter().map(OsString::from));
        } else {
            args.push(substitute_file(arg, file));
        }
    }
    args
}

fn substitute_file(arg: &str, file: &Path) -> OsString {
    let mut pieces = arg.split(FILE_PLACEHOLDER);
    let mut out = OsString::from(pieces.next().unwrap_or_default());
    for piece in pieces {
        out.push(file.as_os_str());
        out.push(piece);
    }
    out
}
