use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

/// A pausable byte source, modelled on a process's standard input.
pub trait InputStream: Send + Sync {
    /// Marks the stream as being read from.
    fn resume(&self);
    /// Returns the stream to idle.
    fn pause(&self);
    /// Blocking read into `buf`; `Ok(0)` means end of stream.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn read(&self, buf: &mut [u8]) -> std::io::Result<usize>;
}

/// The real standard input of this process.
#[derive(Debug)]
pub struct ProcessStdin {
    paused: AtomicBool,
}

impl ProcessStdin {
    #[must_use]
    pub fn new() -> Self {
        ProcessStdin {
            paused: AtomicBool::new(true),
        }
    }
}

impl Default for ProcessStdin {
    fn default() -> Self {
        Self::new()
    }
}

impl InputStream for ProcessStdin {
    fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    fn read(&self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.paused.load(Ordering::Acquire) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "standard input is paused",
            ));
        }
        std::io::stdin().lock().read(buf)
    }
}

/// In-memory [`InputStream`] that records how it was driven.
///
/// Each read hands out at most `chunk` bytes, which lets callers emulate a pipe that
/// delivers input in pieces. Clones share state.
#[derive(Debug, Clone)]
pub struct MemoryInput {
    data: Arc<Mutex<(Vec<u8>, usize)>>,
    chunk: usize,
    fail: bool,
    reads: Arc<AtomicUsize>,
    resumes: Arc<AtomicUsize>,
    pauses: Arc<AtomicUsize>,
}

impl MemoryInput {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        MemoryInput {
            data: Arc::new(Mutex::new((data.into(), 0))),
            chunk: usize::MAX,
            fail: false,
            reads: Arc::default(),
            resumes: Arc::default(),
            pauses: Arc::default(),
        }
    }

    /// Limit every read to at most `chunk` bytes.
    #[must_use]
    pub fn chunked(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    /// Every read fails with a broken pipe error.
    #[must_use]
    pub fn failing() -> Self {
        MemoryInput {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn resumes(&self) -> usize {
        self.resumes.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

impl InputStream for MemoryInput {
    fn resume(&self) {
        self.resumes.fetch_add(1, Ordering::SeqCst);
    }

    fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    fn read(&self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "input closed",
            ));
        }
        let mut guard = self.data.lock();
        let (data, pos) = &mut *guard;
        let n = (data.len() - *pos).min(buf.len()).min(self.chunk);
        buf[..n].copy_from_slice(&data[*pos..*pos + n]);
        *pos += n;
        Ok(n)
    }
}
