use log::info;

use crate::commands::descriptor::CommandSpec;
use crate::context::Context;
use crate::loader::{LoadError, load_commands, load_modules};
use crate::manifest::Manifest;
use crate::services::Services;

/// The loaded command table together with the dependency bag it was built from
#[derive(Debug)]
pub struct Registry {
    commands: Vec<CommandSpec>,
    context: Context,
}

impl Registry {
    /// Load every module of `manifest`, then every command, against `services`.
    ///
    /// # Errors
    ///
    /// Returns the first `LoadError` raised by either phase; nothing is kept on failure.
    pub fn bootstrap(services: Services, manifest: Manifest) -> Result<Self, LoadError> {
        let mut context = Context::new(services);
        load_modules(&mut context, manifest.modules)?;
        let commands = load_commands(&context, manifest.commands)?;
        info!(
            "Loaded {} module(s) and {} command(s)",
            context.keys().count(),
            commands.len()
        );
        Ok(Registry { commands, context })
    }

    /// Commands in registration order.
    #[must_use]
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Look up a command by the first word of its usage pattern.
    #[must_use]
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(CommandSpec::name)
    }
}
