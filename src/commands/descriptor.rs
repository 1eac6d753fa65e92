use thiserror::Error;

use crate::modules::pipes::PipeError;
use crate::services::ParsedArgs;

/// Errors returned by command handlers
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Pipe(#[from] PipeError),
    #[error("{0}")]
    Failed(String),
}

pub type Handler = Box<dyn Fn(&ParsedArgs) -> Result<(), CommandError>>;

/// Schema entry for one `--option` of a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSpec {
    pub alias: Option<char>,
    pub describe: String,
    /// The command refuses to run without this option
    pub demand: bool,
}

impl OptionSpec {
    #[must_use]
    pub fn new(describe: impl Into<String>) -> Self {
        OptionSpec {
            describe: describe.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn alias(mut self, alias: char) -> Self {
        self.alias = Some(alias);
        self
    }

    #[must_use]
    pub fn demand(mut self, demand: bool) -> Self {
        self.demand = demand;
        self
    }
}

/// Description of one subcommand
pub struct CommandSpec {
    /// Usage pattern, e.g. `say <prefix>`
    pub command: String,
    pub desc: String,
    /// Options in declaration order
    pub builder: Vec<(String, OptionSpec)>,
    pub handler: Handler,
}

impl CommandSpec {
    pub fn new<F>(command: impl Into<String>, desc: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ParsedArgs) -> Result<(), CommandError> + 'static,
    {
        CommandSpec {
            command: command.into(),
            desc: desc.into(),
            builder: Vec::new(),
            handler: Box::new(handler),
        }
    }

    #[must_use]
    pub fn option(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        self.builder.push((name.into(), spec));
        self
    }

    /// The first word of the usage pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        self.command.split_whitespace().next().unwrap_or_default()
    }

    /// Invoke the handler.
    ///
    /// # Errors
    ///
    /// Returns whatever the handler returns.
    pub fn run(&self, args: &ParsedArgs) -> Result<(), CommandError> {
        (self.handler)(args)
    }
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("command", &self.command)
            .field("desc", &self.desc)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}
