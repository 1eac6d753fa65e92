use std::sync::Arc;

use parking_lot::Mutex;

/// A line-oriented output sink
pub trait Console: Send + Sync {
    fn log(&self, line: &str);
}

/// Writes every line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn log(&self, line: &str) {
        println!("{line}");
    }
}

/// Keeps every printed line in memory; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all printed lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.lines.lock().last().cloned()
    }
}

impl Console for BufferConsole {
    fn log(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}
