use crate::commands::descriptor::{CommandSpec, OptionSpec};
use crate::context::Context;
use crate::loader::{CommandUnit, LoadError};
use crate::modules::log::Log;
use crate::services::ParsedArgs;

#[must_use]
pub fn unit() -> CommandUnit {
    CommandUnit::new("say", command)
}

/// `say <prefix> --name <name> [--surname <surname>]`
///
/// # Errors
///
/// Returns `LoadError::MissingCapability` if the `log` module is not loaded.
pub fn command(ctx: &Context) -> Result<CommandSpec, LoadError> {
    let log = ctx.require::<Log>("log")?;
    Ok(
        CommandSpec::new("say <prefix>", "Prints: <prefix> name surname", move |argv| {
            log.debug(&message(argv), None);
            Ok(())
        })
        .option(
            "name",
            OptionSpec::new("Pass the name").alias('n').demand(true),
        )
        .option("surname", OptionSpec::new("Pass the surname").alias('s')),
    )
}

fn message(argv: &ParsedArgs) -> String {
    ["prefix", "name", "surname"]
        .into_iter()
        .filter_map(|key| argv.get(key))
        .collect::<Vec<_>>()
        .join(" ")
}
