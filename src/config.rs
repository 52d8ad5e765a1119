//! # Configuration
//!
//! pgforge keeps everything under one root directory (default
//! `$HOME/pgforge`, overridable with `PGFORGE_PATH`):
//!
//! ```text
//! <root>/<name>           install dir of an instance
//! <root>/.pgforge/<name>  working copy of an instance
//! <root>/.pgforge.toml    configuration file
//! ```
//!
//! The configuration file is TOML. On first use a default file is written
//! so there is something to edit:
//!
//! ```toml
//! [repos]
//! urls = ["https://git.postgresql.org/git/postgresql.git"]
//! first_match = true
//!
//! [build]
//! configure_options = []
//! jobs = 8
//! ```
//!
//! The parsed [`Config`] value is threaded explicitly into the code that
//! needs it; there is no global configuration state.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the root directory.
pub const ROOT_ENV_VAR: &str = "PGFORGE_PATH";

/// Configuration file name, relative to the root.
pub const CONFIG_FILE: &str = ".pgforge.toml";

/// Directory holding working copies, relative to the root.
pub const WORK_DIR_NAME: &str = ".pgforge";

/// Ignore marker: an instance whose install dir contains this file is
/// skipped by `install`.
pub const IGNORE_FILE: &str = ".pgforge_ignore";

/// Pattern appended to every working copy's git excludes.
pub const EXCLUDE_PATTERN: &str = ".pgforge*";

/// Locations of the root, working copies and configuration file.
#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve the root from `PGFORGE_PATH` or the home directory.
    pub fn from_env() -> Result<Self> {
        if let Some(root) = env::var_os(ROOT_ENV_VAR) {
            return Ok(Self::new(PathBuf::from(root)));
        }

        let home = dirs::home_dir().ok_or_else(|| Error::Config {
            message: "cannot locate the home directory".to_string(),
            hint: Some(format!("set {} to the desired root", ROOT_ENV_VAR)),
        })?;

        Ok(Self::new(home.join("pgforge")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn work_root(&self) -> PathBuf {
        self.root.join(WORK_DIR_NAME)
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Install dir of a named instance.
    pub fn instance_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Working copy of a named instance.
    pub fn work_dir(&self, name: &str) -> PathBuf {
        self.work_root().join(name)
    }

    /// Create the root and working-copy directories if needed.
    pub fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(self.work_root())?;
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub repos: ReposConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
}

/// Where to look for source repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReposConfig {
    /// Repository URLs, scanned in order during discovery.
    #[serde(default = "default_urls")]
    pub urls: Vec<String>,
    /// Stop at the first repository yielding at least one match.
    #[serde(default = "default_true")]
    pub first_match: bool,
}

/// Build-step settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Default `./configure` options for instances without an explicit
    /// override.
    #[serde(default)]
    pub configure_options: Vec<String>,
    /// Parallelism factor for `make`.
    #[serde(default = "default_jobs")]
    pub jobs: u32,
}

/// Per-command settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandsConfig {
    #[serde(default)]
    pub remove: RemoveConfig,
}

/// Safety pin for the `remove` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoveConfig {
    /// Refuse to remove everything when invoked without explicit targets.
    #[serde(default = "default_true")]
    pub require_args: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repos: ReposConfig::default(),
            build: BuildConfig::default(),
            commands: CommandsConfig::default(),
        }
    }
}

impl Default for ReposConfig {
    fn default() -> Self {
        Self {
            urls: default_urls(),
            first_match: true,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            configure_options: Vec::new(),
            jobs: default_jobs(),
        }
    }
}

impl Default for RemoveConfig {
    fn default() -> Self {
        Self { require_args: true }
    }
}

fn default_urls() -> Vec<String> {
    vec!["https://git.postgresql.org/git/postgresql.git".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_jobs() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

impl Config {
    /// Load the configuration from `<root>/.pgforge.toml`, writing a
    /// default file first if none exists.
    pub fn load(paths: &Paths) -> Result<Self> {
        let path = paths.config_file();

        if !path.exists() {
            let config = Config::default();
            config.save(&path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| Error::Config {
            message: format!("{}: {}", path.display(), e),
            hint: Some("fix or delete the file to regenerate defaults".to_string()),
        })?;

        if config.repos.urls.is_empty() {
            return Err(Error::Config {
                message: format!("{}: repos.urls is empty", path.display()),
                hint: Some("add at least one repository URL".to_string()),
            });
        }

        Ok(config)
    }

    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::new(temp.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config, Config::default());
        assert!(paths.config_file().exists());

        // second load reads the file back
        let config = Config::load(&paths).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::new(temp.path().to_path_buf());
        fs::write(
            paths.config_file(),
            "[repos]\nurls = [\"https://example.org/pg.git\"]\n",
        )
        .unwrap();

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.repos.urls, vec!["https://example.org/pg.git"]);
        assert!(config.repos.first_match);
        assert!(config.commands.remove.require_args);
        assert!(config.build.configure_options.is_empty());
    }

    #[test]
    fn test_empty_urls_rejected() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::new(temp.path().to_path_buf());
        fs::write(paths.config_file(), "[repos]\nurls = []\n").unwrap();

        let err = Config::load(&paths).unwrap_err();
        assert!(err.is_user());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::new(temp.path().to_path_buf());
        fs::write(paths.config_file(), "[repos\nurls = ").unwrap();

        let err = Config::load(&paths).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::new(temp.path().to_path_buf());
        fs::write(paths.config_file(), "[repos]\nurls = [\"u\"]\nfirst = 1\n").unwrap();

        assert!(Config::load(&paths).is_err());
    }

    #[test]
    fn test_instance_paths() {
        let paths = Paths::new(PathBuf::from("/srv/pg"));
        assert_eq!(paths.instance_dir("9.6"), PathBuf::from("/srv/pg/9.6"));
        assert_eq!(
            paths.work_dir("9.6"),
            PathBuf::from("/srv/pg/.pgforge/9.6")
        );
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/srv/pg/.pgforge.toml")
        );
    }

    #[test]
    #[serial]
    fn test_paths_from_env_override() {
        env::set_var(ROOT_ENV_VAR, "/tmp/pgforge-test-root");
        let paths = Paths::from_env().unwrap();
        assert_eq!(paths.root(), Path::new("/tmp/pgforge-test-root"));
        env::remove_var(ROOT_ENV_VAR);
    }
}
