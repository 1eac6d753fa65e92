use crate::commands::descriptor::CommandSpec;
use crate::context::Context;
use crate::loader::{CommandUnit, LoadError};
use crate::modules::log::Log;
use crate::modules::pipes::Pipes;

#[must_use]
pub fn unit() -> CommandUnit {
    CommandUnit::new("echo", command)
}

/// `echo [text]`, falling back to whatever is piped on standard input.
///
/// # Errors
///
/// Returns `LoadError::MissingCapability` if the `log` or `pipes` module is not loaded.
pub fn command(ctx: &Context) -> Result<CommandSpec, LoadError> {
    let pipes = ctx.require::<Pipes>("pipes")?;
    let log = ctx.require::<Log>("log")?;
    Ok(CommandSpec::new(
        "echo [text]",
        "Prints <text>, reading it from standard input when omitted",
        move |_| {
            let text = pipes.default("text")?;
            log.debug(&text, None);
            Ok(())
        },
    ))
}
