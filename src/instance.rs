use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for the single-instance guard.
///
/// `AlreadyRunning` is the expected second-launch path, not a failure: the
/// caller notifies the user and exits 0 without touching persisted state.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("another perch instance is already running (lock file {path})")]
    AlreadyRunning { path: PathBuf },
}

/// Exclusive whole-process lock enforcing that only one instance holds the
/// hotkey listener and the data files.
///
/// Uses platform-native flock on Unix; on Windows the lock file is opened
/// with an exclusive share mode, so a second open fails outright. Exactly
/// one non-blocking attempt is made - there is no wait-and-retry.
#[derive(Debug)]
pub struct InstanceLock {
    _file: File,
    path: PathBuf,
}

impl InstanceLock {
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        let file = open_lock_file(path)?;

        try_lock(&file).map_err(|_| LockError::AlreadyRunning {
            path: path.to_path_buf(),
        })?;

        Ok(InstanceLock {
            _file: file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        // The lock itself is released when the file handle closes; removing
        // the file is best-effort tidiness.
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(not(windows))]
fn open_lock_file(path: &Path) -> Result<File, LockError> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|source| LockError::Create {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(windows)]
fn open_lock_file(path: &Path) -> Result<File, LockError> {
    use std::os::windows::fs::OpenOptionsExt;

    // share_mode(0) refuses any concurrent open of the same file, which is
    // the whole lock: a sharing violation here means a live first instance.
    match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .share_mode(0)
        .open(path)
    {
        Ok(file) => Ok(file),
        Err(_) if path.exists() => Err(LockError::AlreadyRunning {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(LockError::Create {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Try to acquire an exclusive flock on the file (non-blocking)
#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

/// On Windows exclusivity is enforced by the share mode at open time
#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
