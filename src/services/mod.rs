//! Externally supplied services seeded into every [`Context`](crate::context::Context)
//!
//! These are the capabilities the host provides before any module runs: a console sink,
//! a color palette, a shell, the process handle, standard input, the parsed arguments,
//! and the resolved settings. Each lives behind a small trait or handle so tests can swap
//! in doubles.

use std::sync::Arc;

use crate::config_file::Settings;

pub mod argv;
pub mod colors;
pub mod console;
pub mod process;
pub mod shell;
pub mod stdin;

pub use argv::{Argv, ParsedArgs};
pub use colors::Colors;
pub use console::{BufferConsole, Console, StdoutConsole};
pub use process::Process;
pub use shell::{Shell, SystemShell};
pub use stdin::{InputStream, MemoryInput, ProcessStdin};

/// Names under which the seeded services are reachable; modules may never register these.
pub const SEEDED_NAMES: [&str; 7] = [
    "argv", "colors", "console", "process", "settings", "shell", "stdin",
];

/// The statically-typed set of externally supplied capabilities
#[derive(Clone)]
pub struct Services {
    pub console: Arc<dyn Console>,
    pub colors: Colors,
    pub shell: Arc<dyn Shell>,
    pub process: Process,
    pub stdin: Arc<dyn InputStream>,
    pub argv: Argv,
    pub settings: Settings,
}

impl Services {
    /// Services backed by the real process: stdout, `sh`, the current directory and stdin.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the current working directory cannot be determined.
    pub fn system(settings: Settings) -> std::io::Result<Self> {
        let colors = if settings.color {
            Colors::ansi()
        } else {
            Colors::plain()
        };
        Ok(Services {
            console: Arc::new(StdoutConsole),
            colors,
            shell: Arc::new(SystemShell),
            process: Process::current()?,
            stdin: Arc::new(ProcessStdin::new()),
            argv: Argv::default(),
            settings,
        })
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("colors", &self.colors)
            .field("process", &self.process)
            .field("argv", &self.argv)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
