//! std:fs - File handles and whole-file operations

use evolve_sdk::{BuiltinError, BuiltinResult, Handle, HandleKind, HandleRegistry};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// How a file handle was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read from the start
    Read,
    /// Create or truncate, then write
    Write,
    /// Create if missing, write at the end
    Append,
}

impl OpenMode {
    /// Parse a script-supplied mode string
    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "read" | "r" => Some(OpenMode::Read),
            "write" | "w" => Some(OpenMode::Write),
            "append" | "a" => Some(OpenMode::Append),
            _ => None,
        }
    }

    fn options(self) -> OpenOptions {
        let mut opts = OpenOptions::new();
        match self {
            OpenMode::Read => opts.read(true),
            OpenMode::Write => opts.write(true).create(true).truncate(true),
            OpenMode::Append => opts.append(true).create(true),
        };
        opts
    }

    fn readable(self) -> bool {
        self == OpenMode::Read
    }

    fn writable(self) -> bool {
        self != OpenMode::Read
    }
}

struct OpenFile {
    file: File,
    mode: OpenMode,
    path: PathBuf,
}

/// Owns every file a script has opened.
pub struct FileService {
    files: HandleRegistry<OpenFile>,
    max_open: usize,
    // open handles plus opens in flight; bounded by max_open
    slots: AtomicUsize,
}

impl FileService {
    /// Create a service allowing at most `max_open` simultaneously open files
    pub fn new(max_open: usize) -> Self {
        Self {
            files: HandleRegistry::new(HandleKind::File),
            max_open,
            slots: AtomicUsize::new(0),
        }
    }

    /// Open `path`. A failed open never produces a handle.
    pub fn open(&self, path: &str, mode: OpenMode) -> BuiltinResult<Handle> {
        let max_open = self.max_open;
        self.slots
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                (cur < max_open).then_some(cur + 1)
            })
            .map_err(|_| {
                BuiltinError::IoError(format!("{}: too many open files (limit {})", path, max_open))
            })?;

        let file = match mode.options().open(path) {
            Ok(file) => file,
            Err(e) => {
                self.slots.fetch_sub(1, Ordering::SeqCst);
                return Err(BuiltinError::from_io(path, e));
            }
        };
        let handle = self.files.insert(OpenFile {
            file,
            mode,
            path: PathBuf::from(path),
        });
        tracing::debug!(%handle, path, ?mode, "open");
        Ok(handle)
    }

    /// Read everything from the current position to the end.
    pub fn read_all(&self, handle: Handle) -> BuiltinResult<Vec<u8>> {
        self.files.with_mut(handle, |f| {
            if !f.mode.readable() {
                return Err(mode_mismatch(&f.path, "reading"));
            }
            let mut buf = Vec::new();
            f.file
                .read_to_end(&mut buf)
                .map_err(|e| BuiltinError::from_io(&display(&f.path), e))?;
            Ok(buf)
        })?
    }

    /// Write all of `data`, returning the number of bytes written.
    pub fn write(&self, handle: Handle, data: &[u8]) -> BuiltinResult<u64> {
        self.files.with_mut(handle, |f| {
            if !f.mode.writable() {
                return Err(mode_mismatch(&f.path, "writing"));
            }
            f.file
                .write_all(data)
                .map_err(|e| BuiltinError::from_io(&display(&f.path), e))?;
            Ok(data.len() as u64)
        })?
    }

    /// Close a handle. Closing twice is an error.
    ///
    /// The handle is released even when the final flush fails.
    pub fn close(&self, handle: Handle) -> BuiltinResult<()> {
        let mut f = self.files.release(handle)?;
        self.slots.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(%handle, path = %f.path.display(), "close");
        flush(&mut f)
    }

    /// Number of open handles
    pub fn open_count(&self) -> usize {
        self.files.live_count()
    }

    /// Close every open handle, returning how many were still open.
    pub fn close_all(&self) -> usize {
        let drained = self.files.drain_live();
        let count = drained.len();
        self.slots.fetch_sub(count, Ordering::SeqCst);
        for (handle, mut f) in drained {
            tracing::debug!(%handle, path = %f.path.display(), "close (cleanup)");
            if let Err(e) = flush(&mut f) {
                tracing::warn!(%handle, error = %e, "flush failed during cleanup");
            }
        }
        count
    }
}

impl Default for FileService {
    fn default() -> Self {
        Self::new(256)
    }
}

fn flush(f: &mut OpenFile) -> BuiltinResult<()> {
    if f.mode.writable() {
        f.file
            .flush()
            .map_err(|e| BuiltinError::from_io(&display(&f.path), e))?;
    }
    Ok(())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn mode_mismatch(path: &Path, op: &str) -> BuiltinError {
    BuiltinError::IoError(format!("{}: not opened for {}", path.display(), op))
}

/// Read a whole file in one call
pub fn read_file(path: &str) -> BuiltinResult<Vec<u8>> {
    fs::read(path).map_err(|e| BuiltinError::from_io(path, e))
}

/// Create or truncate `path` and write `data` in one call
pub fn write_file(path: &str, data: &[u8]) -> BuiltinResult<u64> {
    fs::write(path, data).map_err(|e| BuiltinError::from_io(path, e))?;
    Ok(data.len() as u64)
}
