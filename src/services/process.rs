use std::path::{Path, PathBuf};

/// The running process, as seen by commands: its working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Process {
    pub cwd: PathBuf,
}

impl Process {
    /// Captures the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the current working directory is unavailable.
    pub fn current() -> std::io::Result<Self> {
        Ok(Process {
            cwd: std::env::current_dir()?,
        })
    }

    #[must_use]
    pub fn at(cwd: impl Into<PathBuf>) -> Self {
        Process { cwd: cwd.into() }
    }

    /// Joins `path` onto the working directory without touching the filesystem.
    #[must_use]
    pub fn join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.cwd.join(path)
    }

    /// Absolute form of `path`: kept as-is when absolute, otherwise relative to the working directory.
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.join(path)
        }
    }
}
