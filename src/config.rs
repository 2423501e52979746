//! # Persisted Configuration
//!
//! `.githerd` files hold named flag presets ("shortcuts") and extra git
//! pass-through commands, in INI form:
//!
//! ```ini
//! [shortcut "work"]
//! root = ~/work
//! branch = develop
//!
//! [command "st"]
//! git = status --short
//! usage = Short status for each repository.
//! ```
//!
//! Files are searched in the current directory, its ancestors, and the
//! home directory; the nearest file defining a name wins. Everything is
//! loaded once at startup into an immutable [`Settings`] value that is
//! passed where it is needed. A file that fails to parse is reported and
//! skipped, not fatal.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::path::{Path, PathBuf};

use ini::Ini;
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::repository::quoted_section;

/// File name looked for in each search location.
pub const CONFIG_FILENAME: &str = ".githerd";

/// A `command "<name>"` section: an extra git pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCommand {
    /// Tokens passed to git before the run's own arguments.
    pub git: Vec<String>,
    pub usage: Option<String>,
    pub help: Option<String>,
    pub interactive: bool,
}

/// Everything the configuration files contribute to a run.
#[derive(Debug, Default)]
pub struct Settings {
    shortcuts: HashMap<String, HashMap<String, String>>,
    commands: BTreeMap<String, CustomCommand>,
}

impl Settings {
    /// Load from the standard search locations.
    pub fn load() -> Settings {
        Settings::from_files(&ordered_config_files())
    }

    /// Load from an explicit ordered list of files, nearest first.
    pub fn from_files(paths: &[PathBuf]) -> Settings {
        let mut settings = Settings::default();

        for path in paths {
            let config = match Ini::load_from_file(path) {
                Ok(config) => config,
                Err(err) => {
                    warn!("cannot read configuration file {}: {err}", path.display());
                    continue;
                }
            };
            settings.absorb(&config, path);
        }

        settings
    }

    /// Fold one parsed file in. Earlier files already absorbed are nearer,
    /// so existing names are left alone.
    fn absorb(&mut self, config: &Ini, path: &Path) {
        for (section, properties) in config.iter() {
            let Some(section) = section else { continue };

            if let Some(name) = quoted_section(section, "shortcut") {
                if self.shortcuts.contains_key(name) {
                    continue;
                }
                let values: HashMap<String, String> = properties
                    .iter()
                    .map(|(key, value)| (key.to_lowercase(), value.to_string()))
                    .collect();
                debug!("shortcut \"{name}\" from {}", path.display());
                self.shortcuts.insert(name.to_string(), values);
            }

            if let Some(name) = quoted_section(section, "command") {
                if self.commands.contains_key(name) {
                    continue;
                }
                let Some(git) = properties.get("git") else {
                    warn!(
                        "ignoring command \"{name}\" in {}: no git subcommand",
                        path.display()
                    );
                    continue;
                };
                let command = CustomCommand {
                    git: git.split_whitespace().map(String::from).collect(),
                    usage: properties.get("usage").map(String::from),
                    help: properties.get("help").map(String::from),
                    interactive: truthy(properties.get("interactive")),
                };
                debug!("command \"{name}\" from {}", path.display());
                self.commands.insert(name.to_string(), command);
            }
        }
    }

    /// The flag preset registered under `name`.
    pub fn shortcut(&self, name: &str) -> Result<&HashMap<String, String>> {
        self.shortcuts
            .get(name)
            .ok_or_else(|| Error::UnknownShortcut {
                name: name.to_string(),
                hint: Some(format!(
                    "add a [shortcut \"{name}\"] section to {CONFIG_FILENAME}"
                )),
            })
    }

    /// Configuration-registered commands, in name order.
    pub fn commands(&self) -> &BTreeMap<String, CustomCommand> {
        &self.commands
    }
}

/// `yes`, `1` and `true` enable a flag value; anything else does not.
fn truthy(value: Option<&str>) -> bool {
    matches!(value, Some("yes") | Some("1") | Some("true"))
}

/// Configuration files in precedence order: the current directory, each
/// ancestor on the way up, then the home directory.
fn ordered_config_files() -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Ok(mut dir) = env::current_dir() {
        loop {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.is_file() {
                files.push(candidate);
            }
            if !dir.pop() {
                break;
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        let candidate = home.join(CONFIG_FILENAME);
        if candidate.is_file() && !files.contains(&candidate) {
            files.push(candidate);
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_shortcut_values_and_lowercased_keys() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            ".githerd",
            "[shortcut \"work\"]\n\
             Root = /work\n\
             BRANCH = develop\n\
             depth = 2\n",
        );

        let settings = Settings::from_files(&[path]);
        let values = settings.shortcut("work").unwrap();
        assert_eq!(values.get("root").map(String::as_str), Some("/work"));
        assert_eq!(values.get("branch").map(String::as_str), Some("develop"));
        assert_eq!(values.get("depth").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_unknown_shortcut_reports_a_hint() {
        let settings = Settings::default();
        match settings.shortcut("missing") {
            Err(Error::UnknownShortcut { name, hint }) => {
                assert_eq!(name, "missing");
                assert!(hint.unwrap().contains(".githerd"));
            }
            other => panic!("expected UnknownShortcut, got {other:?}"),
        }
    }

    #[test]
    fn test_nearest_file_wins() {
        let dir = TempDir::new().unwrap();
        let near = write_config(&dir, "near", "[shortcut \"work\"]\nbranch = develop\n");
        let far = write_config(
            &dir,
            "far",
            "[shortcut \"work\"]\nbranch = release\n\
             [shortcut \"play\"]\nname = toys\n",
        );

        let settings = Settings::from_files(&[near, far]);
        let work = settings.shortcut("work").unwrap();
        assert_eq!(work.get("branch").map(String::as_str), Some("develop"));
        // Names only the farther file defines are still visible.
        assert!(settings.shortcut("play").is_ok());
    }

    #[test]
    fn test_custom_command_parsing() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            ".githerd",
            "[command \"st\"]\n\
             git = status --short\n\
             usage = Short status.\n\
             [command \"sw\"]\n\
             git = switch\n\
             interactive = yes\n",
        );

        let settings = Settings::from_files(&[path]);
        let st = settings.commands().get("st").unwrap();
        assert_eq!(st.git, ["status", "--short"]);
        assert_eq!(st.usage.as_deref(), Some("Short status."));
        assert_eq!(st.help, None);
        assert!(!st.interactive);

        let sw = settings.commands().get("sw").unwrap();
        assert_eq!(sw.git, ["switch"]);
        assert!(sw.interactive);
    }

    #[test]
    fn test_command_without_git_key_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, ".githerd", "[command \"broken\"]\nusage = Nope.\n");

        let settings = Settings::from_files(&[path]);
        assert!(settings.commands().is_empty());
    }

    #[test]
    fn test_unparseable_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let bad = write_config(&dir, "bad", "[unterminated\n");
        let good = write_config(&dir, "good", "[shortcut \"work\"]\nbranch = develop\n");

        let settings = Settings::from_files(&[bad, good]);
        assert!(settings.shortcut("work").is_ok());
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::from_files(&[dir.path().join("absent")]);
        assert!(settings.commands().is_empty());
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(Some("yes")));
        assert!(truthy(Some("1")));
        assert!(truthy(Some("true")));
        assert!(!truthy(Some("no")));
        assert!(!truthy(Some("")));
        assert!(!truthy(None));
    }
}
