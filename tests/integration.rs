use std::cell::RefCell;
use std::rc::Rc;

use mycli::commands::CommandSpec;
use mycli::dispatch::{DispatchError, execute};
use mycli::services::{BufferConsole, MemoryInput, Process};
use mycli::testing::{test_services, with_input};
use mycli::{CommandUnit, LoadError, Manifest, ModuleUnit, Registry, load_settings, manifest_for};

fn builtin() -> (Registry, BufferConsole) {
    let (services, console, _) = test_services();
    let registry = Registry::bootstrap(services, Manifest::builtin()).unwrap();
    (registry, console)
}

#[test]
fn test_say_prefix_and_name() {
    let (registry, console) = builtin();
    execute(&registry, ["mycli", "say", "Hello", "--name", "CLI"]).unwrap();
    assert_eq!(console.lines(), vec!["[MyCli] Hello CLI"]);
}

#[test]
fn test_say_prefix_name_and_surname() {
    let (registry, console) = builtin();
    execute(&registry, ["mycli", "say", "Hello", "-n", "CLI", "-s", "ILC"]).unwrap();
    assert_eq!(console.lines(), vec!["[MyCli] Hello CLI ILC"]);
}

#[test]
fn test_demanded_option_checked_before_handler() {
    let (registry, console) = builtin();
    match execute(&registry, ["mycli", "say", "Hello"]) {
        Err(DispatchError::MissingArgument { command, argument }) => {
            assert_eq!(command, "say");
            assert_eq!(argument, "name");
        }
        other => panic!("Expected MissingArgument, got: {other:?}"),
    }
    assert!(console.lines().is_empty());
}

#[test]
fn test_required_positional_checked() {
    let (registry, _) = builtin();
    assert!(matches!(
        execute(&registry, ["mycli", "say", "--name", "CLI"]),
        Err(DispatchError::MissingArgument { argument, .. }) if argument == "prefix"
    ));
}

#[test]
fn test_unknown_subcommand_is_a_cli_error() {
    let (registry, _) = builtin();
    assert!(matches!(
        execute(&registry, ["mycli", "shout"]),
        Err(DispatchError::Cli(_))
    ));
}

#[test]
fn test_help_lists_commands_in_order() {
    let (registry, _) = builtin();
    match execute(&registry, ["mycli", "--help"]) {
        Err(DispatchError::Cli(e)) => {
            let help = e.to_string();
            let create = help.find("create").expect("create listed");
            let say = help.find("say").expect("say listed");
            assert!(create < say, "help: {help}");
            assert!(help.contains("Scaffolding command to create a new module"));
        }
        other => panic!("Expected help output, got: {other:?}"),
    }
}

#[test]
fn test_create_copies_scaffolding() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template");
    std::fs::create_dir_all(&template).unwrap();
    std::fs::write(template.join("README.md"), "# template\n").unwrap();

    let (mut services, console, _) = test_services();
    services.process = Process::at(dir.path());
    services.settings.scaffolding = template;
    let registry = Registry::bootstrap(services, Manifest::builtin()).unwrap();

    execute(&registry, ["mycli", "create", "fresh"]).unwrap();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("fresh/README.md")).unwrap(),
        "# template\n"
    );
    assert_eq!(console.lines().len(), 1);
}

#[test]
fn test_default_reads_stdin_when_option_missing() {
    let (services, console, input) = with_input(MemoryInput::new("piped value\n"));
    let registry = Registry::bootstrap(services, Manifest::builtin()).unwrap();

    execute(&registry, ["mycli", "echo"]).unwrap();
    assert_eq!(console.lines(), vec!["[MyCli] piped value"]);
    assert_eq!(input.resumes(), 1);
    assert_eq!(input.pauses(), 1);
}

#[test]
fn test_default_prefers_given_option() {
    let (services, console, input) = with_input(MemoryInput::new("piped value\n"));
    let registry = Registry::bootstrap(services, Manifest::builtin()).unwrap();

    execute(&registry, ["mycli", "echo", "given"]).unwrap();
    assert_eq!(console.lines(), vec!["[MyCli] given"]);
    assert_eq!(input.reads(), 0);
}

#[test]
fn test_module_order_drives_visibility() {
    let observed: Rc<RefCell<Vec<(String, bool)>>> = Rc::default();
    let first = Rc::clone(&observed);
    let second = Rc::clone(&observed);
    let manifest = Manifest::new()
        .module(
            ModuleUnit::new("b-client", move |deps| {
                second
                    .borrow_mut()
                    .push(("bClient".into(), deps.contains("aConfig")));
                Ok(format!("client of {}", deps.require::<String>("aConfig")?))
            })
            .requires(["aConfig"]),
        )
        .module(ModuleUnit::new("a-config", move |deps| {
            first
                .borrow_mut()
                .push(("aConfig".into(), deps.contains("bClient")));
            Ok("config".to_string())
        }));

    let registry = Registry::bootstrap(test_services().0, manifest).unwrap();
    assert_eq!(
        *observed.borrow(),
        vec![("aConfig".to_string(), false), ("bClient".to_string(), true)]
    );
    assert_eq!(
        *registry.context().require::<String>("bClient").unwrap(),
        "client of config"
    );
}

#[test]
fn test_command_factories_see_every_module() {
    let seen: Rc<RefCell<Vec<Vec<String>>>> = Rc::default();
    let mut manifest = Manifest::builtin();
    for name in ["zz", "aa"] {
        let seen = Rc::clone(&seen);
        manifest = manifest.command(CommandUnit::new(name, move |ctx| {
            seen.borrow_mut().push(ctx.keys().map(str::to_string).collect());
            Ok(CommandSpec::new(name, "", |_| Ok(())))
        }));
    }
    Registry::bootstrap(test_services().0, manifest).unwrap();
    for keys in seen.borrow().iter() {
        assert_eq!(keys, &vec!["log".to_string(), "pipes".to_string()]);
    }
}

#[test]
fn test_directory_selected_units() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("lib/modules")).unwrap();
    std::fs::create_dir_all(dir.path().join("lib/commands")).unwrap();
    std::fs::write(dir.path().join("lib/modules/log.js"), "").unwrap();
    std::fs::write(dir.path().join("lib/commands/say.js"), "").unwrap();
    std::fs::write(
        dir.path().join(".mycli.yaml"),
        "prefix: Demo\nmodules_dir: lib/modules\ncommands_dir: lib/commands\n",
    )
    .unwrap();

    let settings = load_settings(None, dir.path(), false).unwrap();
    let manifest = manifest_for(&settings).unwrap();
    let (mut services, console, _) = test_services();
    services.settings = settings;
    let registry = Registry::bootstrap(services, manifest).unwrap();

    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["say"]);
    assert!(!registry.context().contains("pipes"));
    execute(&registry, ["mycli", "say", "Hi", "--name", "there"]).unwrap();
    assert_eq!(console.lines(), vec!["[Demo] Hi there"]);
}

#[test]
fn test_command_missing_its_module_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("modules")).unwrap();
    std::fs::create_dir_all(dir.path().join("commands")).unwrap();
    std::fs::write(dir.path().join("commands/say"), "").unwrap();

    let manifest = Manifest::from_dirs(
        &dir.path().join("modules"),
        &dir.path().join("commands"),
        Manifest::builtin(),
    )
    .unwrap();
    match Registry::bootstrap(test_services().0, manifest) {
        Err(LoadError::Factory { unit, source }) => {
            assert_eq!(unit, "say");
            assert!(matches!(*source, LoadError::MissingCapability(ref key) if key == "log"));
        }
        other => panic!("Expected Factory error, got: {other:?}"),
    }
}
