use crate::error::StoreError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Exclusive lock over a single decision document.
///
/// Creates `<target>.lock` with `create_new`, so at most one writer holds
/// a document at a time. Committing renames the lock file over the target;
/// dropping an uncommitted lock removes it and leaves the target untouched.
pub struct Lockfile {
    target: PathBuf,
    lock_path: PathBuf,
    file: Option<fs::File>,
}

impl Lockfile {
    pub fn acquire(target: impl AsRef<Path>) -> Result<Self, StoreError> {
        let target = target.as_ref().to_path_buf();
        let lock_path = lock_path_for(&target);

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(file) => Ok(Self {
                target,
                lock_path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(StoreError::LockConflict(lock_path.display().to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Like [`Lockfile::acquire`], but waits out a held lock for up to
    /// `attempts` tries spaced by `delay`. A lock file untouched for longer
    /// than `stale_after` was left by a writer that died; it is removed and
    /// acquisition retried.
    pub fn acquire_with_retry(
        target: impl AsRef<Path>,
        attempts: u32,
        delay: Duration,
        stale_after: Duration,
    ) -> Result<Self, StoreError> {
        let target = target.as_ref();
        let mut tries = 0;
        loop {
            match Self::acquire(target) {
                Err(StoreError::LockConflict(path)) => {
                    let lock_path = lock_path_for(target);
                    if lock_age(&lock_path).is_some_and(|age| age > stale_after) {
                        tracing::warn!(lock = %path, "breaking stale lock");
                        match fs::remove_file(&lock_path) {
                            Ok(()) => continue,
                            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                            Err(e) => return Err(StoreError::Io(e)),
                        }
                    }
                    tries += 1;
                    if tries >= attempts {
                        tracing::warn!(lock = %path, tries, "giving up on held lock");
                        return Err(StoreError::LockConflict(path));
                    }
                    thread::sleep(delay);
                }
                other => return other,
            }
        }
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), StoreError> {
        match self.file {
            Some(ref mut file) => {
                file.write_all(data)?;
                file.flush()?;
                Ok(())
            }
            None => Err(StoreError::LockConflict(
                "lock file already committed or dropped".into(),
            )),
        }
    }

    /// Atomically replace the target with what was written to the lock.
    pub fn commit(mut self) -> Result<(), StoreError> {
        self.file.take();
        fs::rename(&self.lock_path, &self.target)?;
        Ok(())
    }
}

impl Drop for Lockfile {
    fn drop(&mut self) {
        if self.file.is_some() {
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}

/// Time since the lock file was last modified, if it still exists.
fn lock_age(lock_path: &Path) -> Option<Duration> {
    fs::metadata(lock_path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
}

pub(crate) fn lock_path_for(target: &Path) -> PathBuf {
    target.with_extension(
        target
            .extension()
            .map(|e| format!("{}.lock", e.to_string_lossy()))
            .unwrap_or_else(|| "lock".to_string()),
    )
}
