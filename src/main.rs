//! # run-macro
//!
//! Run editor macros from a file.
//!
//! ## Usage
//!
//! - Positional: `run-macro notes.md tidy wrap`
//! - Named: `run-macro --file notes.md --macros '["tidy","wrap"]'`
//! - One macro: `run-macro notes.md --macro tidy`
//! - Check what would run: `run-macro --inspect notes.md tidy`
//!
//! The runner program comes from `--runner`, `RUN_MACRO_RUNNER`, or the
//! `[runner]` table of `.runmacro.toml`.

/// Entry point for the CLI tool.
fn main() {
    run_macro::cli::run_cli();
}
