use std::ffi::OsString;
use std::io::IsTerminal;
use std::process::ExitCode;

use mycli::dispatch::{self, DispatchError, GlobalOptions};
use mycli::services::Services;
use mycli::{Registry, load_settings, manifest_for};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args: Vec<OsString> = std::env::args_os().collect();
    let options = GlobalOptions::scan(args.iter().cloned());

    let log_file = options
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    mycli::logger::init(log_file, std::io::stderr().is_terminal());

    let cwd = std::env::current_dir()?;
    let settings = load_settings(
        options.config.as_deref(),
        &cwd,
        std::io::stdout().is_terminal(),
    )?;
    let manifest = manifest_for(&settings)?;
    let registry = Registry::bootstrap(Services::system(settings)?, manifest)?;

    match dispatch::execute(&registry, args) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(DispatchError::Cli(e)) => e.exit(),
        Err(e) => Err(e.into()),
    }
}
