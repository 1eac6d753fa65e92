use std::sync::Arc;

use log::{debug, trace};
use thiserror::Error;

use crate::loader::ModuleUnit;
use crate::services::{Argv, InputStream};

/// Size of each read from standard input
pub const BUFFER_LENGTH: usize = 32;

#[derive(Error, Debug)]
pub enum PipeError {
    #[error("Unable to read standard input: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves option values from the command line, falling back to standard input.
pub struct Pipes {
    argv: Argv,
    stdin: Arc<dyn InputStream>,
}

impl Pipes {
    #[must_use]
    pub fn new(argv: Argv, stdin: Arc<dyn InputStream>) -> Self {
        Pipes { argv, stdin }
    }

    /// The value of `option` if it was given, otherwise everything currently readable on
    /// standard input with one trailing newline removed.
    ///
    /// Reading blocks until the input ends or a read comes back short of
    /// [`BUFFER_LENGTH`]. Nothing is cached: once input is exhausted further calls
    /// return an empty string.
    ///
    /// # Errors
    ///
    /// Returns `PipeError::Io` if reading fails. The stream is paused again either way.
    pub fn default(&self, option: &str) -> Result<String, PipeError> {
        if let Some(value) = self.argv.get(option) {
            trace!("Option '{option}' given on the command line");
            return Ok(value);
        }

        debug!("Reading '{option}' from standard input");
        self.stdin.resume();
        let read = read_available(self.stdin.as_ref());
        self.stdin.pause();

        let mut data = read?;
        if data.ends_with('\n') {
            data.pop();
        }
        Ok(data)
    }
}

fn read_available(stdin: &dyn InputStream) -> std::io::Result<String> {
    let mut buffer = [0_u8; BUFFER_LENGTH];
    let mut bytes = Vec::new();
    loop {
        let n = stdin.read(&mut buffer)?;
        bytes.extend_from_slice(&buffer[..n]);
        if n < BUFFER_LENGTH {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl std::fmt::Debug for Pipes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipes")
            .field("argv", &self.argv)
            .finish_non_exhaustive()
    }
}

#[must_use]
pub fn unit() -> ModuleUnit {
    ModuleUnit::new("pipes", |deps| {
        let services = deps.services();
        Ok(Pipes::new(
            services.argv.clone(),
            Arc::clone(&services.stdin),
        ))
    })
}
