//! # Store Lock
//!
//! One exclusive lock file guarding both JSON stores for the duration of
//! an invocation. Two concurrent runs would race the load-evaluate-save
//! cycle and could double-send alerts or lose registry edits, so the
//! second run fails fast instead of queueing.
//!
//! Uses `flock(LOCK_EX | LOCK_NB)`: the kernel drops the lock when the
//! holding process exits, so a crashed run never leaves a stale lock
//! behind. The lock file itself is left in place between runs.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tmark_core::PersistenceError;

/// RAII guard for the store lock. The lock is held for the lifetime of
/// the guard and released on drop (or process exit).
#[derive(Debug)]
pub struct StoreLock {
    // Held open for the guard's lifetime; the flock rides on this fd.
    _file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Acquire the exclusive lock, without blocking.
    ///
    /// # Errors
    ///
    /// [`PersistenceError::LockHeld`] when another process holds the lock,
    /// [`PersistenceError::Lock`] for any other failure to open or lock
    /// the file.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let lock_err = |source| PersistenceError::Lock {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(lock_err)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(lock_err)?;

        match try_flock_exclusive(&file) {
            Ok(true) => {
                tracing::debug!(path = %path.display(), "acquired store lock");
                Ok(Self { _file: file, path })
            }
            Ok(false) => Err(PersistenceError::LockHeld {
                path: path.display().to_string(),
            }),
            Err(source) => Err(lock_err(source)),
        }
    }

    /// The lock file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Try to take a non-blocking exclusive `flock` on `file`.
///
/// `Ok(true)` means the lock is held, `Ok(false)` means another process
/// holds it. On non-Unix targets this is a no-op that always succeeds.
fn try_flock_exclusive(file: &File) -> io::Result<bool> {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        let fd = file.as_raw_fd();
        // SAFETY: flock is a standard POSIX call and fd is a valid
        // descriptor owned by `file` for the duration of the call.
        let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
        if result == 0 {
            return Ok(true);
        }
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::WouldBlock || err.raw_os_error() == Some(libc::EWOULDBLOCK)
        {
            return Ok(false);
        }
        Err(err)
    }
    #[cfg(not(unix))]
    {
        let _ = file;
        Ok(true)
    }
}
