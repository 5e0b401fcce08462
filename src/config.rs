//! Runner configuration (`.runmacro.toml`) discovery and loading.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the config file searched for in the working tree and home directory.
pub const CONFIG_FILE_NAME: &str = ".runmacro.toml";

/// Environment variable that overrides `runner.program`.
pub const RUNNER_ENV_VAR: &str = "RUN_MACRO_RUNNER";

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub runner: RunnerConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Program to launch; looked up on `PATH` unless it contains a separator.
    pub program: Option<String>,
    /// Argument template with `{file}` and `{macros}` placeholders.
    pub args: Vec<String>,
    /// Start the runner without waiting for it.
    pub detach: bool,
}

impl Config {
    /// Parse config text. `path` is only used for the error message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the text is not valid config toml.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pick the runner program: flag first, then environment, then file.
    #[must_use]
    pub fn runner_program(&self, flag: Option<&str>, env: Option<String>) -> Option<String> {
        flag.map(str::to_string)
            .or(env.filter(|value| !value.is_empty()))
            .or_else(|| self.runner.program.clone())
    }
}

/// Resolve an explicit `--config` value: a file, or a directory holding one.
fn explicit_config_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Search `start` and its parents for a config file, stopping at `home` or
/// the root, then fall back to `home/.runmacro.toml`.
#[must_use]
pub fn find_config_path_from(start: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let mut current_dir = Some(start);

    while let Some(dir) = current_dir {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        if home.is_some_and(|home| dir == home) {
            break;
        }

        current_dir = dir.parent();
    }

    home.map(|home| home.join(CONFIG_FILE_NAME))
        .filter(|candidate| candidate.is_file())
}

/// Find the config file for this process.
#[must_use]
pub fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(explicit_config_path(path));
    }

    let home = dirs::home_dir();
    match std::env::current_dir() {
        Ok(dir) => find_config_path_from(&dir, home.as_deref()),
        Err(_) => home
            .map(|home| home.join(CONFIG_FILE_NAME))
            .filter(|candidate| candidate.is_file()),
    }
}

/// Load the config, or defaults when no file exists.
///
/// An explicit path that does not exist is a read error; a file that is
/// merely absent from the search path is not.
///
/// # Errors
///
/// Returns [`Error::ReadConfig`] if the file cannot be read and
/// [`Error::Config`] if it does not parse.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let Some(path) = find_config_path(explicit) else {
        debug!("no {CONFIG_FILE_NAME} found, using defaults");
        return Ok(Config::default());
    };

    debug!(path = %path.display(), "loading config");
    let content = fs::read_to_string(&path).map_err(|source| Error::ReadConfig {
        path: path.clone(),
        source,
    })?;
    Config::from_toml(&content, &path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
[runner]
program = "atom"
args = ["--run-macro", "{file}", "{macros}"]
detach = true
"#,
            Path::new(CONFIG_FILE_NAME),
        )
        .unwrap();

        assert_eq!(config.runner.program.as_deref(), Some("atom"));
        assert_eq!(config.runner.args, vec!["--run-macro", "{file}", "{macros}"]);
        assert!(config.runner.detach);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("", Path::new(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_key_is_error() {
        let err = Config::from_toml("[runner]\nprogramme = \"x\"\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_runner_program_precedence() {
        let config = Config {
            runner: RunnerConfig {
                program: Some("from-file".to_string()),
                ..RunnerConfig::default()
            },
        };

        assert_eq!(
            config.runner_program(Some("from-flag"), Some("from-env".to_string())),
            Some("from-flag".to_string())
        );
        assert_eq!(
            config.runner_program(None, Some("from-env".to_string())),
            Some("from-env".to_string())
        );
        assert_eq!(
            config.runner_program(None, Some(String::new())),
            Some("from-file".to_string())
        );
        assert_eq!(Config::default().runner_program(None, None), None);
    }

    #[test]
    fn test_find_config_in_parent_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let expected = write_config(temp.path(), "");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_path_from(&nested, None), Some(expected));
    }

    #[test]
    fn test_search_stops_at_home() {
        let temp = tempfile::TempDir::new().unwrap();
        write_config(temp.path(), "");
        let home = temp.path().join("home");
        let project = home.join("project");
        fs::create_dir_all(&project).unwrap();

        assert_eq!(find_config_path_from(&project, Some(&home)), None);
    }

    #[test]
    fn test_home_config_fallback() {
        let temp = tempfile::TempDir::new().unwrap();
        let home = temp.path().join("home");
        let elsewhere = temp.path().join("elsewhere");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&elsewhere).unwrap();
        let expected = write_config(&home, "");

        assert_eq!(find_config_path_from(&elsewhere, Some(&home)), Some(expected));
    }

    #[test]
    fn test_explicit_directory_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let expected = write_config(temp.path(), "[runner]\nprogram = \"echo\"\n");

        assert_eq!(find_config_path(Some(temp.path())), Some(expected));
        let config = load_config(Some(temp.path())).unwrap();
        assert_eq!(config.runner.program.as_deref(), Some("echo"));
    }

    #[test]
    fn test_explicit_missing_file_names_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");

        let err = load_config(Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::ReadConfig { .. }));
        assert!(err.to_string().contains(&missing.display().to_string()));
    }
}
