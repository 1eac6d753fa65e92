use std::sync::Arc;

use log::info;

use crate::commands::descriptor::{CommandError, CommandSpec};
use crate::context::Context;
use crate::loader::{CommandUnit, LoadError};
use crate::modules::log::Log;

#[must_use]
pub fn unit() -> CommandUnit {
    CommandUnit::new("create", command)
}

/// `create <moduleName>`: copy the scaffolding template into `<cwd>/<moduleName>`.
///
/// # Errors
///
/// Returns `LoadError::MissingCapability` if the `log` module is not loaded.
pub fn command(ctx: &Context) -> Result<CommandSpec, LoadError> {
    let log = ctx.require::<Log>("log")?;
    let services = ctx.services();
    let shell = Arc::clone(&services.shell);
    let process = services.process.clone();
    let template = services.settings.scaffolding.clone();

    Ok(CommandSpec::new(
        "create <moduleName>",
        "Scaffolding command to create a new module",
        move |argv| {
            let name = argv
                .get("moduleName")
                .ok_or_else(|| CommandError::Failed("a module name is required".into()))?;
            let target = process.join(name);
            info!(
                "Copying {} to {}",
                template.display(),
                target.display()
            );
            shell.copy_dir(&template, &target)?;
            log.debug("Created", Some(&target.display().to_string()));
            Ok(())
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{Colors, ParsedArgs, Process};
    use crate::testing::test_services;

    #[test]
    fn test_copies_template_into_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template");
        std::fs::create_dir_all(template.join("src")).unwrap();
        std::fs::write(template.join("src/lib.rs"), "// new module\n").unwrap();
        let work = dir.path().join("work");
        std::fs::create_dir_all(&work).unwrap();

        let (mut services, console, _) = test_services();
        services.process = Process::at(&work);
        services.settings.scaffolding = template;
        let mut ctx = Context::new(services);
        let log = Log::new(Arc::new(console.clone()), Colors::plain(), "MyCli");
        ctx.insert("log".into(), Arc::new(log));

        let spec = command(&ctx).unwrap();
        let args: ParsedArgs = [("moduleName", "demo")].into_iter().collect();
        spec.run(&args).unwrap();

        assert_eq!(
            std::fs::read_to_string(work.join("demo/src/lib.rs")).unwrap(),
            "// new module\n"
        );
        let line = console.last().unwrap();
        assert!(line.starts_with("[MyCli] Created "), "got: {line}");
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (mut services, console, _) = test_services();
        services.process = Process::at(dir.path());
        services.settings.scaffolding = dir.path().join("nope");
        let mut ctx = Context::new(services);
        ctx.insert(
            "log".into(),
            Arc::new(Log::new(Arc::new(console), Colors::plain(), "MyCli")),
        );

        let spec = command(&ctx).unwrap();
        let args: ParsedArgs = [("moduleName", "demo")].into_iter().collect();
        assert!(matches!(spec.run(&args), Err(CommandError::Io(_))));
    }
}
