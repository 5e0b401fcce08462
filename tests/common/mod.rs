//! Common test helpers shared across integration tests

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)] // Not all helpers are used by every test file

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Package version for testing --version flag
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper to get the compiled binary path
pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_run-macro"))
}

/// Helper to create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// The temp dir as the child process will see it from `current_dir()`.
pub fn canonical(dir: &Path) -> PathBuf {
    dir.canonicalize().unwrap()
}

/// Helper to create a .runmacro.toml in a directory
pub fn create_config(dir: &Path, content: &str) {
    fs::write(dir.join(".runmacro.toml"), content).unwrap();
}

/// Helper to create a Command isolated from the user's config and environment
pub fn test_command(dir: &Path) -> Command {
    let mut cmd = Command::new(get_binary_path());
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("RUN_MACRO_RUNNER")
        .env_remove("RUST_LOG");
    cmd
}

/// Run with `args` in `dir` and collect the output
pub fn run_in(dir: &Path, args: &[&str]) -> Output {
    test_command(dir)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Parse `--inspect` output
pub fn inspect_json(output: &Output) -> serde_json::Value {
    serde_json::from_str(&stdout(output)).expect("inspect output is JSON")
}
