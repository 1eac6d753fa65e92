//! Turns the command table into a clap command line and routes a parsed invocation to
//! its handler
//!
//! The table is only known once the registry is loaded, so the CLI is assembled with
//! clap's builder API. Required options and positionals are not declared to clap; they
//! are enforced by [`validate`] right before the handler runs.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;
use thiserror::Error;

use crate::commands::descriptor::{CommandError, CommandSpec};
use crate::registry::Registry;
use crate::services::ParsedArgs;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid usage pattern '{pattern}': {reason}")]
    InvalidUsage { pattern: String, reason: String },
    #[error("Command '{0}' is registered more than once")]
    DuplicateCommand(String),
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    #[error("No command given")]
    NoCommand,
    #[error("Missing required argument '{argument}' for command '{command}'")]
    MissingArgument { command: String, argument: String },
    #[error(transparent)]
    Cli(#[from] clap::Error),
    #[error("Command '{command}' failed: {source}")]
    Command {
        command: String,
        #[source]
        source: CommandError,
    },
}

/// A positional placeholder of a usage pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positional {
    pub name: String,
    pub required: bool,
}

/// A parsed usage pattern such as `say <prefix> [suffix]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub name: String,
    pub positionals: Vec<Positional>,
}

impl Usage {
    /// Parse a usage pattern: a command name followed by `<required>` and `[optional]`
    /// placeholders.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidUsage` if the name is missing or a placeholder is malformed.
    pub fn parse(pattern: &str) -> Result<Usage, DispatchError> {
        let invalid = |reason: &str| DispatchError::InvalidUsage {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };
        let mut words = pattern.split_whitespace();
        let name = words
            .next()
            .filter(|w| !w.starts_with(['<', '[']))
            .ok_or_else(|| invalid("missing command name"))?;

        let positionals = words
            .map(|word| {
                let (inner, required) = if let Some(inner) =
                    word.strip_prefix('<').and_then(|w| w.strip_suffix('>'))
                {
                    (inner, true)
                } else if let Some(inner) =
                    word.strip_prefix('[').and_then(|w| w.strip_suffix(']'))
                {
                    (inner, false)
                } else {
                    return Err(invalid(&format!("'{word}' is not a <placeholder>")));
                };
                if inner.is_empty() || inner.contains(['<', '>', '[', ']']) {
                    return Err(invalid(&format!("'{word}' is not a <placeholder>")));
                }
                Ok(Positional {
                    name: inner.to_string(),
                    required,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Usage {
            name: name.to_string(),
            positionals,
        })
    }
}

/// Options accepted before any subcommand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

fn global_args() -> [Arg; 2] {
    [
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("PATH")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Path to config file (auto-detected if not specified)"),
        Arg::new("log-file")
            .long("log-file")
            .value_name("PATH")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Also write diagnostics to this file"),
    ]
}

impl GlobalOptions {
    fn from_matches(matches: &ArgMatches) -> Self {
        GlobalOptions {
            config: matches.get_one::<PathBuf>("config").cloned(),
            log_file: matches.get_one::<PathBuf>("log-file").cloned(),
        }
    }

    /// Pick the global options out of a full command line without knowing the commands.
    ///
    /// Anything unrecognised is ignored; the real parse happens once the registry is loaded.
    pub fn scan<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Command::new("mycli")
            .args(global_args())
            .allow_external_subcommands(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .ignore_errors(true)
            .try_get_matches_from(args)
            .map(|m| Self::from_matches(&m))
            .unwrap_or_default()
    }
}

/// The top-level command without any subcommands.
#[must_use]
pub fn root_command() -> Command {
    Command::new("mycli")
        .about("A minimal command-line tool framework")
        .version(env!("CARGO_PKG_VERSION"))
        .args(global_args())
        .subcommand_required(true)
        .arg_required_else_help(true)
}

/// Add one subcommand per registered command to `root`, in registration order.
///
/// # Errors
///
/// Returns `DispatchError::InvalidUsage` for a malformed usage pattern or
/// `DispatchError::DuplicateCommand` if two commands share a name.
pub fn build_cli(root: Command, commands: &[CommandSpec]) -> Result<Command, DispatchError> {
    let mut cli = root;
    let mut seen = HashSet::new();
    for spec in commands {
        let sub = subcommand(spec)?;
        if !seen.insert(sub.get_name().to_string()) {
            return Err(DispatchError::DuplicateCommand(sub.get_name().to_string()));
        }
        cli = cli.subcommand(sub);
    }
    Ok(cli)
}

fn subcommand(spec: &CommandSpec) -> Result<Command, DispatchError> {
    let usage = Usage::parse(&spec.command)?;
    check_arguments(spec, &usage)?;
    let mut cmd = Command::new(usage.name).about(spec.desc.clone());
    for (index, positional) in usage.positionals.iter().enumerate() {
        cmd = cmd.arg(
            Arg::new(positional.name.clone())
                .index(index + 1)
                .value_name(positional.name.clone())
                .action(ArgAction::Set),
        );
    }
    for (name, option) in &spec.builder {
        let mut arg = Arg::new(name.clone())
            .long(name.clone())
            .help(option.describe.clone())
            .action(ArgAction::Set);
        if let Some(alias) = option.alias {
            arg = arg.short(alias);
        }
        cmd = cmd.arg(arg);
    }
    Ok(cmd)
}

/// Reject argument sets clap cannot represent: repeated ids or aliases, and anything
/// shadowing the generated `help` flag.
fn check_arguments(spec: &CommandSpec, usage: &Usage) -> Result<(), DispatchError> {
    let invalid = |reason: String| DispatchError::InvalidUsage {
        pattern: spec.command.clone(),
        reason,
    };
    let names = usage
        .positionals
        .iter()
        .map(|p| p.name.as_str())
        .chain(spec.builder.iter().map(|(name, _)| name.as_str()));
    let mut ids = HashSet::new();
    for name in names {
        if name == "help" {
            return Err(invalid("'help' is reserved".into()));
        }
        if !ids.insert(name) {
            return Err(invalid(format!("argument '{name}' is declared more than once")));
        }
    }

    let mut aliases = HashSet::new();
    for (name, option) in &spec.builder {
        let Some(alias) = option.alias else { continue };
        if alias == 'h' {
            return Err(invalid(format!("alias '-h' of '{name}' is reserved for help")));
        }
        if !aliases.insert(alias) {
            return Err(invalid(format!("alias '-{alias}' is used more than once")));
        }
    }
    Ok(())
}

fn collect_args(spec: &CommandSpec, usage: &Usage, matches: &ArgMatches) -> ParsedArgs {
    let ids = usage
        .positionals
        .iter()
        .map(|p| p.name.as_str())
        .chain(spec.builder.iter().map(|(name, _)| name.as_str()));
    let mut args = ParsedArgs::new();
    for id in ids {
        if let Ok(Some(value)) = matches.try_get_one::<String>(id) {
            args.insert(id, value.clone());
        }
    }
    args
}

/// Check every required positional and every demanded option of `spec` against `args`.
///
/// # Errors
///
/// Returns `DispatchError::MissingArgument` naming the first argument that is absent.
pub fn validate(spec: &CommandSpec, args: &ParsedArgs) -> Result<(), DispatchError> {
    let usage = Usage::parse(&spec.command)?;
    let required = usage
        .positionals
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.as_str())
        .chain(
            spec.builder
                .iter()
                .filter(|(_, o)| o.demand)
                .map(|(name, _)| name.as_str()),
        );
    for argument in required {
        if !args.contains(argument) {
            return Err(DispatchError::MissingArgument {
                command: usage.name.clone(),
                argument: argument.to_string(),
            });
        }
    }
    Ok(())
}

/// Route parsed `matches` to the matching command of `registry`.
///
/// The arguments are published through the shared `argv` service before the handler runs.
///
/// # Errors
///
/// Returns `DispatchError` if no known command was selected, validation fails, or the
/// handler fails.
pub fn dispatch(registry: &Registry, matches: &ArgMatches) -> Result<(), DispatchError> {
    let (name, sub) = matches.subcommand().ok_or(DispatchError::NoCommand)?;
    let spec = registry
        .command(name)
        .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;
    let usage = Usage::parse(&spec.command)?;
    let args = collect_args(spec, &usage, sub);
    validate(spec, &args)?;

    debug!("Running command '{name}'");
    registry.context().services().argv.set(args.clone());
    spec.run(&args).map_err(|source| DispatchError::Command {
        command: name.to_string(),
        source,
    })
}

/// Build the CLI for `registry`, parse `args` and run the selected command.
///
/// # Errors
///
/// Returns `DispatchError::Cli` for clap parse errors (including help and version
/// requests), otherwise the errors of [`build_cli`] and [`dispatch`].
pub fn execute<I, T>(registry: &Registry, args: I) -> Result<(), DispatchError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli(root_command(), registry.commands())?.try_get_matches_from(args)?;
    dispatch(registry, &matches)
}
