//! Single-instance guard
//!
//! Two bot processes polling the same token steal updates from each other,
//! so startup takes an exclusive lock file holding the PID and removes it on
//! shutdown.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::core::error::{AppError, AppResult};

/// Lock file held for the lifetime of the process. Removed on drop.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Creates `path` exclusively and writes the current PID into it.
    ///
    /// # Errors
    /// * `AppError::AlreadyRunning` - the file already exists
    /// * `AppError::Io` - the file could not be created or written
    pub fn acquire(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = match fs_err::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let pid = fs_err::read_to_string(&path)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                return Err(AppError::AlreadyRunning {
                    path: path.display().to_string(),
                    pid,
                });
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = write!(file, "{}", std::process::id()) {
            let _ = fs_err::remove_file(&path);
            return Err(e.into());
        }

        log::info!("🔒 Lock file acquired: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        match fs_err::remove_file(&self.path) {
            Ok(()) => log::info!("🔓 Lock file released: {}", self.path.display()),
            Err(e) => log::warn!("Failed to remove lock file: {}", e),
        }
    }
}
