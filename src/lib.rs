//! Core implementation of the mycli command-line framework
//!
//! mycli wires a set of commands to a shared, typed dependency bag. Externally supplied
//! services seed a [`Context`]; modules are then loaded one by one, each contributing a
//! capability the modules after it may use; finally every command is built against the
//! complete context and handed to the clap-based dispatcher.

use std::path::Path;

use log::{debug, warn};

use crate::config_file::{Config, ConfigError, Settings};

pub mod commands;
pub mod config_file;
pub mod context;
pub mod dispatch;
pub mod loader;
pub mod logger;
pub mod manifest;
pub mod modules;
pub mod registry;
pub mod services;
pub mod testing;

pub use context::Context;
pub use loader::{CommandUnit, LoadError, ModuleUnit};
pub use manifest::Manifest;
pub use registry::Registry;

/// Load settings from `config_file`, or from a `.mycli.*` file found in `cwd` or its parents.
///
/// Without any config file the defaults apply. `color` is the fallback when the config
/// does not set it.
///
/// # Errors
///
/// Returns `ConfigError` if an explicit config file does not exist, or a config file
/// cannot be parsed or holds invalid values.
pub fn load_settings(
    config_file: Option<&Path>,
    cwd: &Path,
    color: bool,
) -> Result<Settings, ConfigError> {
    let config_path = match config_file {
        Some(file) => {
            let path = cwd.join(file);
            if !path.exists() {
                return Err(ConfigError::ConfigNotFound(path));
            }
            Some(path)
        }
        None => Config::find_config(cwd),
    };
    let Some(config_path) = config_path else {
        debug!("No config file found, using defaults");
        return Ok(Settings {
            color,
            ..Settings::default()
        });
    };

    let base = config_path
        .parent()
        .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
    debug!(
        "Loading settings from {} (base: {})",
        config_path.display(),
        base.display()
    );
    let config = Config::from_file(&config_path)?;
    if let Some(version) = &config.mycli_version {
        validate_version(version);
    }
    let mut settings = Settings::from_config(config, &base, color)?;
    settings.config_path = Some(config_path);
    Ok(settings)
}

/// Warn if the config's `mycli_version` doesn't match the binary version
fn validate_version(config_version: &str) {
    let binary_version = env!("CARGO_PKG_VERSION");
    if config_version != binary_version {
        warn!(
            "Config mycli_version '{config_version}' differs from binary version '{binary_version}'"
        );
    }
}

/// The manifest described by `settings`: directory-selected units when both unit
/// directories are configured, every built-in unit otherwise.
///
/// # Errors
///
/// Returns `LoadError` if a configured directory cannot be read or names an unknown unit.
pub fn manifest_for(settings: &Settings) -> Result<Manifest, LoadError> {
    match (&settings.modules_dir, &settings.commands_dir) {
        (Some(modules), Some(commands)) => {
            Manifest::from_dirs(modules, commands, Manifest::builtin())
        }
        (None, None) => Ok(Manifest::builtin()),
        (Some(dir), None) | (None, Some(dir)) => Err(LoadError::Invalid(format!(
            "modules_dir and commands_dir must be set together (only {} is set)",
            dir.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(None, dir.path(), true).unwrap();
        assert_eq!(settings.prefix, config_file::DEFAULT_PREFIX);
        assert!(settings.color);
        assert_eq!(settings.config_path, None);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        match load_settings(Some(Path::new("missing.yaml")), dir.path(), false) {
            Err(ConfigError::ConfigNotFound(path)) => {
                assert_eq!(path, dir.path().join("missing.yaml"));
            }
            other => panic!("Expected ConfigNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn test_discovered_config_applies() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".mycli.yaml"),
            "mycli_version: '0.0.1'\nprefix: Tool\ncolor: false\nscaffolding: tpl\n",
        )
        .unwrap();
        let nested = dir.path().join("sub");
        std::fs::create_dir_all(&nested).unwrap();

        let settings = load_settings(None, &nested, true).unwrap();
        assert_eq!(settings.prefix, "Tool");
        assert!(!settings.color);
        assert_eq!(settings.scaffolding, dir.path().join("tpl"));
        assert_eq!(settings.config_path, Some(dir.path().join(".mycli.yaml")));
    }

    #[test]
    fn test_manifest_for_needs_both_dirs() {
        let settings = Settings {
            modules_dir: Some(PathBuf::from("/nowhere")),
            ..Settings::default()
        };
        assert!(matches!(manifest_for(&settings), Err(LoadError::Invalid(_))));
        assert_eq!(manifest_for(&Settings::default()).unwrap().commands.len(), 3);
    }
}
