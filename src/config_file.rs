//! Configuration file handling for mycli

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("Unable to parse YAML config file {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("Unable to parse JSON config file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("Invalid config: {0}")]
    Validation(String),
}

/// Raw contents of a `.mycli.*` file; every field is optional
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub mycli_version: Option<String>,
    pub prefix: Option<String>,
    pub color: Option<bool>,
    pub scaffolding: Option<PathBuf>,
    pub modules_dir: Option<PathBuf>,
    pub commands_dir: Option<PathBuf>,
}

/// List of supported configuration file names
const FILENAMES: [&str; 3] = [".mycli.json", ".mycli.yaml", ".mycli.yml"];

pub const DEFAULT_PREFIX: &str = "MyCli";

impl Config {
    /// Loads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file cannot be read, or
    /// `ConfigError::Yaml`/`ConfigError::Json` if parsing fails.
    pub fn from_file(file: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(file)
            .map_err(|_| ConfigError::ConfigNotFound(file.to_path_buf()))?;
        if file.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
                source: e,
                path: file.to_path_buf(),
            })
        } else if contents.trim().is_empty() {
            Ok(Config::default())
        } else {
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Yaml {
                source: e,
                path: file.to_path_buf(),
            })
        }
    }

    /// Searches for a configuration file in `start` and its parents.
    #[must_use]
    pub fn find_config(start: &Path) -> Option<PathBuf> {
        let mut path = start.to_path_buf();
        debug!("Searching for config file in {}", start.display());
        loop {
            for file in &FILENAMES {
                let config_path = path.join(file);
                if config_path.exists() {
                    info!("Found config file: {}", config_path.display());
                    return Some(config_path);
                }
            }
            if !path.pop() {
                return None;
            }
        }
    }
}

/// Fully resolved settings, seeded into the context as the `settings` service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Text shown between brackets at the start of every `log` line
    pub prefix: String,
    pub color: bool,
    /// Directory copied by the `create` command
    pub scaffolding: PathBuf,
    /// When both directories are set, units are discovered from them
    pub modules_dir: Option<PathBuf>,
    pub commands_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            prefix: DEFAULT_PREFIX.to_string(),
            color: false,
            scaffolding: default_scaffolding(),
            modules_dir: None,
            commands_dir: None,
            config_path: None,
        }
    }
}

/// The scaffolding template shipped next to the crate sources.
#[must_use]
pub fn default_scaffolding() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("scaffolding/create")
}

impl Settings {
    /// Resolve a parsed config against the directory it was loaded from.
    ///
    /// `color` is used when the config does not decide.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the prefix is blank.
    pub fn from_config(config: Config, base: &Path, color: bool) -> Result<Settings, ConfigError> {
        let prefix = config.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if prefix.trim().is_empty() {
            return Err(ConfigError::Validation("prefix must not be empty".into()));
        }
        Ok(Settings {
            prefix,
            color: config.color.unwrap_or(color),
            scaffolding: config
                .scaffolding
                .map_or_else(default_scaffolding, |p| base.join(p)),
            modules_dir: config.modules_dir.map(|p| base.join(p)),
            commands_dir: config.commands_dir.map(|p| base.join(p)),
            config_path: None,
        })
    }
}
