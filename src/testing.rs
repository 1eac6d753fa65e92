//! In-memory services for exercising commands and modules without a terminal

use std::sync::Arc;

use crate::config_file::Settings;
use crate::services::{Argv, BufferConsole, Colors, MemoryInput, Process, Services, SystemShell};

/// Services writing to a [`BufferConsole`] and reading from an empty [`MemoryInput`].
#[must_use]
pub fn test_services() -> (Services, BufferConsole, MemoryInput) {
    with_input(MemoryInput::new(Vec::new()))
}

/// Like [`test_services`], with `input` as standard input.
#[must_use]
pub fn with_input(input: MemoryInput) -> (Services, BufferConsole, MemoryInput) {
    let console = BufferConsole::new();
    let services = Services {
        console: Arc::new(console.clone()),
        colors: Colors::plain(),
        shell: Arc::new(SystemShell),
        process: Process::at(std::env::temp_dir()),
        stdin: Arc::new(input.clone()),
        argv: Argv::default(),
        settings: Settings::default(),
    };
    (services, console, input)
}
