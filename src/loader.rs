//! Two-phase registration of modules and commands
//!
//! Modules are loaded first, one at a time in lexical name order, each registered under the
//! camel-cased form of its name so that later modules can build on earlier ones. Commands are
//! loaded afterwards against the complete bag. Any failure aborts the whole load.

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::commands::descriptor::CommandSpec;
use crate::context::{Capability, Context, Deps};
use crate::services::SEEDED_NAMES;

/// Errors raised while building the dependency bag and the command table
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unable to read unit directory {path}: {source}")]
    DirectoryNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No factory named '{0}' is available")]
    UnknownUnit(String),
    #[error("Unit name '{0}' does not produce a valid capability key")]
    InvalidName(String),
    #[error("Module '{unit}' would overwrite capability '{key}'")]
    DuplicateCapability { unit: String, key: String },
    #[error("Module '{unit}' requires '{key}', which is not registered before it")]
    MissingDependency { unit: String, key: String },
    #[error("Module '{unit}' reads '{key}' without declaring it")]
    Undeclared { unit: String, key: String },
    #[error("Capability '{0}' is not registered")]
    MissingCapability(String),
    #[error("Capability '{key}' is not a {expected}")]
    CapabilityType { key: String, expected: &'static str },
    #[error("Unit '{unit}' failed to load: {source}")]
    Factory {
        unit: String,
        #[source]
        source: Box<LoadError>,
    },
    #[error("{0}")]
    Invalid(String),
}

type ModuleFactory = Box<dyn Fn(&Deps<'_>) -> Result<Capability, LoadError>>;
type CommandFactory = Box<dyn Fn(&Context) -> Result<CommandSpec, LoadError>>;

/// A named factory contributing one capability to the bag
pub struct ModuleUnit {
    pub name: String,
    pub requires: Vec<String>,
    factory: ModuleFactory,
}

impl ModuleUnit {
    pub fn new<T, F>(name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Deps<'_>) -> Result<T, LoadError> + 'static,
    {
        ModuleUnit {
            name: name.into(),
            requires: Vec::new(),
            factory: Box::new(move |deps| factory(deps).map(|c| Arc::new(c) as Capability)),
        }
    }

    /// Declare the module capabilities this factory reads.
    #[must_use]
    pub fn requires<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(keys.into_iter().map(Into::into));
        self
    }
}

impl std::fmt::Debug for ModuleUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleUnit")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

/// A named factory producing one command descriptor
pub struct CommandUnit {
    pub name: String,
    factory: CommandFactory,
}

impl CommandUnit {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Context) -> Result<CommandSpec, LoadError> + 'static,
    {
        CommandUnit {
            name: name.into(),
            factory: Box::new(factory),
        }
    }
}

impl std::fmt::Debug for CommandUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandUnit")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Turn a unit name into a camel-case capability key.
///
/// A name without lower-case letters is lower-cased first. Every non-alphanumeric character
/// separates segments; the first segment is lower-cased at its start (fully, if it is all
/// upper-case) and every following segment is capitalised.
#[must_use]
pub fn camel_case(name: &str) -> String {
    let lowered;
    let name = if name.chars().any(char::is_lowercase) {
        name
    } else {
        lowered = name.to_lowercase();
        &lowered
    };
    let mut key = String::with_capacity(name.len());
    for segment in name.split(|c: char| !c.is_alphanumeric()).filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        let Some(first) = chars.next() else { continue };
        if key.is_empty() {
            if segment.chars().all(|c| !c.is_lowercase()) {
                key.push_str(&segment.to_lowercase());
            } else {
                key.extend(first.to_lowercase());
                key.push_str(chars.as_str());
            }
        } else {
            key.extend(first.to_uppercase());
            key.push_str(chars.as_str());
        }
    }
    key
}

/// Register every module into `ctx`, in lexical order of unit name.
///
/// # Errors
///
/// Stops at the first unit that has an unusable name, collides with an existing key,
/// requires a capability that is not yet registered, or whose factory fails.
pub fn load_modules(ctx: &mut Context, mut units: Vec<ModuleUnit>) -> Result<(), LoadError> {
    units.sort_by(|a, b| a.name.cmp(&b.name));
    for unit in units {
        let key = camel_case(&unit.name);
        if key.is_empty() {
            return Err(LoadError::InvalidName(unit.name));
        }
        if SEEDED_NAMES.contains(&key.as_str()) || ctx.contains(&key) {
            return Err(LoadError::DuplicateCapability {
                unit: unit.name,
                key,
            });
        }
        if let Some(missing) = unit.requires.iter().find(|r| !ctx.contains(r)) {
            return Err(LoadError::MissingDependency {
                unit: unit.name.clone(),
                key: missing.clone(),
            });
        }

        let capability = (unit.factory)(&Deps::new(ctx, &unit.name, &unit.requires)).map_err(
            |e| LoadError::Factory {
                unit: unit.name.clone(),
                source: Box::new(e),
            },
        )?;
        debug!("Registered module '{}' as '{key}'", unit.name);
        ctx.insert(key, capability);
    }
    Ok(())
}

/// Build every command against the complete bag, in lexical order of unit name.
///
/// # Errors
///
/// Returns `LoadError::Factory` for the first factory that fails.
pub fn load_commands(
    ctx: &Context,
    mut units: Vec<CommandUnit>,
) -> Result<Vec<CommandSpec>, LoadError> {
    units.sort_by(|a, b| a.name.cmp(&b.name));
    units
        .into_iter()
        .map(|unit| -> Result<CommandSpec, LoadError> {
            let spec = (unit.factory)(ctx).map_err(|e| LoadError::Factory {
                unit: unit.name.clone(),
                source: Box::new(e),
            })?;
            debug!("Registered command '{}' from unit '{}'", spec.command, unit.name);
            Ok(spec)
        })
        .collect()
}
