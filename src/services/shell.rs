use std::path::Path;
use std::process::{Command as ProcessCommand, ExitStatus};

use walkdir::WalkDir;

/// Filesystem and process helpers used by command handlers
pub trait Shell: Send + Sync {
    /// Recursively copies the contents of `src` into `dst`, creating `dst` and
    /// overwriting files that already exist there. Symbolic links are recreated, not followed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `src` cannot be read or `dst` cannot be written.
    fn copy_dir(&self, src: &Path, dst: &Path) -> std::io::Result<()>;

    /// Runs `command` through `sh -c` in `cwd`, inheriting stdio.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the shell cannot be spawned.
    fn exec(&self, command: &str, cwd: &Path) -> std::io::Result<ExitStatus>;
}

/// [`Shell`] backed by `std::fs`, `walkdir` and `sh`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

impl Shell for SystemShell {
    fn copy_dir(&self, src: &Path, dst: &Path) -> std::io::Result<()> {
        if !std::fs::metadata(src)?.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a directory", src.display()),
            ));
        }
        std::fs::create_dir_all(dst)?;
        for entry in WalkDir::new(src).follow_links(false).min_depth(1) {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            let target = dst.join(relative);
            let file_type = entry.file_type();
            if file_type.is_dir() {
                std::fs::create_dir_all(&target)?;
            } else if file_type.is_symlink() {
                copy_link(entry.path(), &target)?;
            } else {
                std::fs::copy(entry.path(), &target)?;
            }
        }
        Ok(())
    }

    fn exec(&self, command: &str, cwd: &Path) -> std::io::Result<ExitStatus> {
        ProcessCommand::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .status()
    }
}

#[cfg(unix)]
fn copy_link(link: &Path, target: &Path) -> std::io::Result<()> {
    let pointee = std::fs::read_link(link)?;
    if let Ok(existing) = std::fs::symlink_metadata(target) {
        if existing.is_dir() {
            std::fs::remove_dir_all(target)?;
        } else {
            std::fs::remove_file(target)?;
        }
    }
    std::os::unix::fs::symlink(pointee, target)
}

#[cfg(not(unix))]
fn copy_link(link: &Path, target: &Path) -> std::io::Result<()> {
    if std::fs::metadata(link)?.is_dir() {
        SystemShell.copy_dir(link, target)
    } else {
        std::fs::copy(link, target).map(|_| ())
    }
}
