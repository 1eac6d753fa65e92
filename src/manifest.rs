//! The explicit list of units to load, with optional directory-driven selection

use std::collections::BTreeSet;
use std::path::Path;

use log::debug;

use crate::commands;
use crate::loader::{CommandUnit, LoadError, ModuleUnit};
use crate::modules;

#[derive(Debug, Default)]
pub struct Manifest {
    pub modules: Vec<ModuleUnit>,
    pub commands: Vec<CommandUnit>,
}

impl Manifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything shipped with mycli.
    #[must_use]
    pub fn builtin() -> Self {
        Manifest {
            modules: modules::builtin(),
            commands: vec![
                commands::create::unit(),
                commands::say::unit(),
                commands::echo::unit(),
            ],
        }
    }

    #[must_use]
    pub fn module(mut self, unit: ModuleUnit) -> Self {
        self.modules.push(unit);
        self
    }

    #[must_use]
    pub fn command(mut self, unit: CommandUnit) -> Self {
        self.commands.push(unit);
        self
    }

    /// Select units from `catalog` by the file names found in two directories.
    ///
    /// Each regular, non-hidden file contributes its stem as a unit name; files sharing a
    /// stem count once.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::DirectoryNotFound` if a directory cannot be read, or
    /// `LoadError::UnknownUnit` if a file names a unit the catalog does not have.
    pub fn from_dirs(
        modules_dir: &Path,
        commands_dir: &Path,
        mut catalog: Manifest,
    ) -> Result<Self, LoadError> {
        let mut selected = Manifest::new();
        for name in discover(modules_dir)? {
            let index = catalog
                .modules
                .iter()
                .position(|u| u.name == name)
                .ok_or_else(|| LoadError::UnknownUnit(name.clone()))?;
            selected.modules.push(catalog.modules.swap_remove(index));
        }
        for name in discover(commands_dir)? {
            let index = catalog
                .commands
                .iter()
                .position(|u| u.name == name)
                .ok_or_else(|| LoadError::UnknownUnit(name.clone()))?;
            selected.commands.push(catalog.commands.swap_remove(index));
        }
        Ok(selected)
    }
}

/// Unit names found in `dir`, in lexical order.
///
/// # Errors
///
/// Returns `LoadError::DirectoryNotFound` if `dir` cannot be listed.
pub fn discover(dir: &Path) -> Result<BTreeSet<String>, LoadError> {
    let not_found = |source| LoadError::DirectoryNotFound {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(not_found)? {
        let entry = entry.map_err(not_found)?;
        if !entry.file_type().map_err(not_found)?.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem.is_empty() || stem.starts_with('.') {
            continue;
        }
        names.insert(stem.to_string());
    }
    debug!("Discovered {} unit(s) in {}", names.len(), dir.display());
    Ok(names)
}
