//! The resolved file and macro names for one launcher run.
//!
//! Precedence, highest first:
//!
//! | value  | 1st         | 2nd                | 3rd                  |
//! |--------|-------------|--------------------|----------------------|
//! | file   | `--file`    | positional 0       | none                 |
//! | macros | `--macros`  | `--macro` as `[x]` | positionals after 0  |

use crate::error::{Error, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Raw option values as they came off the command line.
#[derive(Debug, Default, Clone)]
pub struct RawOptions {
    pub file: Option<PathBuf>,
    pub macros: Option<Vec<String>>,
    pub single_macro: Option<String>,
    /// Kept as `OsString` so a non-UTF-8 file name survives untouched.
    pub positionals: Vec<OsString>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Absolute path of the macro-bearing file, if one was given.
    pub file: Option<PathBuf>,
    pub macros: Vec<String>,
}

impl Invocation {
    #[must_use]
    pub fn new(file: Option<PathBuf>, macros: Vec<String>) -> Self {
        Self { file, macros }
    }

    /// Apply the precedence table and make the file absolute against `cwd`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMacroList`] when a `--macros` value looks like a
    /// JSON array but does not decode to a list of strings, and
    /// [`Error::NonUtf8Macro`] when a positional macro name is not UTF-8.
    pub fn resolve(options: RawOptions, cwd: &Path) -> Result<Self> {
        let RawOptions {
            file,
            macros,
            single_macro,
            positionals,
        } = options;

        let mut positionals = positionals.into_iter();
        let first_positional = positionals.next().map(PathBuf::from);

        let file = file
            .or(first_positional)
            .map(|path| resolve_path(&path, cwd));

        let macros = match (macros, single_macro) {
            (Some(values), _) => parse_macro_list(&values)?,
            (None, Some(name)) => vec![name],
            (None, None) => positionals
                .map(|name| {
                    name.into_string().map_err(|name| Error::NonUtf8Macro {
                        value: name.to_string_lossy().into_owned(),
                    })
                })
                .collect::<Result<Vec<String>>>()?,
        };

        Ok(Self::new(file, macros))
    }

    /// Pretty JSON form, as printed by `--inspect`.
    ///
    /// # Errors
    ///
    /// Fails only if the path is not valid UTF-8.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Absolute paths pass through; relative ones are joined onto `cwd`.
#[must_use]
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Flatten repeated `--macros` values in order.
///
/// A value starting with `[` is read as a JSON array of strings; anything
/// else is a single macro name.
///
/// # Errors
///
/// Returns [`Error::InvalidMacroList`] for a malformed JSON array.
pub fn parse_macro_list(values: &[String]) -> Result<Vec<String>> {
    let mut macros = Vec::new();
    for value in values {
        if value.trim_start().starts_with('[') {
            let names: Vec<String> =
                serde_json::from_str(value).map_err(|e| Error::InvalidMacroList {
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            macros.extend(names);
        } else {
            macros.push(value.clone());
        }
    }
    Ok(macros)
}
