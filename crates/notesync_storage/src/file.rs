//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use parking_lot::Mutex;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Suffix of the advisory lock file kept next to the data file.
const LOCK_SUFFIX: &str = ".lock";
/// Suffix of temporary files used for atomic replaces.
const TEMP_SUFFIX: &str = ".tmp";

/// A file-based storage backend.
///
/// The blob lives in a single file. Data survives process restarts.
///
/// # Atomicity
///
/// `replace_all` writes the new blob to a uniquely named temporary file in
/// the same directory, syncs it, and renames it over the data file. A reader
/// therefore opens either the complete old file or the complete new one.
///
/// The directory is synced after the rename so the rename survives a crash.
/// Once the rename succeeds `replace_all` returns `Ok`; a failed directory
/// sync is only logged, since readers already see the new blob.
///
/// # Exclusivity
///
/// The backend holds an exclusive advisory lock on `<file>.lock` for as long
/// as it is alive, so two server processes cannot share one data file.
///
/// # Example
///
/// ```no_run
/// use notesync_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::open(Path::new("notes.json")).unwrap();
/// backend.replace_all(b"[]").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    /// Held for exclusive access to `path`.
    _lock_file: File,
    /// Serializes writers; readers go straight to the file system.
    write_guard: Mutex<()>,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The data file itself is not created until the first `replace_all`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Locked`] if another process holds the data
    /// file, or an I/O error if the lock file cannot be created.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let lock_path = sibling_path(path, LOCK_SUFFIX);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked {
                path: path.to_path_buf(),
            });
        }

        debug!(path = %path.display(), "opened file backend");

        Ok(Self {
            path: path.to_path_buf(),
            _lock_file: lock_file,
            write_guard: Mutex::new(()),
        })
    }

    /// Opens a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the lock cannot
    /// be acquired.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Returns the path to the data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_temp(&self, temp_path: &Path, data: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        Ok(())
    }

    /// Syncs the containing directory so a completed rename is durable.
    #[cfg(unix)]
    fn sync_directory(&self) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        File::open(dir)?.sync_all()
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> io::Result<()> {
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn replace_all(&self, data: &[u8]) -> StorageResult<()> {
        let _guard = self.write_guard.lock();

        let temp_path = sibling_path(
            &self.path,
            &format!(".{}{}", uuid::Uuid::new_v4().simple(), TEMP_SUFFIX),
        );

        let result = self
            .write_temp(&temp_path, data)
            .and_then(|()| fs::rename(&temp_path, &self.path));

        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(path = %temp_path.display(), error = %cleanup, "failed to remove temp file");
                }
            }
            return Err(e.into());
        }

        // The rename has committed the new blob; a failed directory sync
        // only weakens durability across a crash.
        if let Err(e) = self.sync_directory() {
            warn!(path = %self.path.display(), error = %e, "failed to sync data directory");
        }
        debug!(path = %self.path.display(), bytes = data.len(), "replaced data file");
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

/// Returns `path` with `suffix` appended to its file name.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("notes"));
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn file_open_does_not_create_data_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let backend = FileBackend::open(&path).unwrap();
        assert!(!path.exists());
        assert!(backend.read_all().unwrap().is_none());
        assert_eq!(backend.size().unwrap(), 0);
    }

    #[test]
    fn file_replace_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let backend = FileBackend::open(&path).unwrap();
        backend.replace_all(b"first").unwrap();
        backend.replace_all(b"second").unwrap();

        assert_eq!(backend.read_all().unwrap().unwrap(), b"second");
        assert_eq!(backend.size().unwrap(), 6);
    }

    #[test]
    fn file_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        {
            let backend = FileBackend::open(&path).unwrap();
            backend.replace_all(b"persistent data").unwrap();
        }

        {
            let backend = FileBackend::open(&path).unwrap();
            assert_eq!(backend.read_all().unwrap().unwrap(), b"persistent data");
        }
    }

    #[test]
    fn file_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let backend = FileBackend::open(&path).unwrap();
        for i in 0..5 {
            backend.replace_all(format!("blob {i}").as_bytes()).unwrap();
        }

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(TEMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn file_readers_never_see_partial_blob() {
        const LEN: usize = 256 * 1024;
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(&dir.path().join("notes.json")).unwrap();
        let blobs = [vec![b'a'; LEN], vec![b'b'; LEN]];
        backend.replace_all(&blobs[0]).unwrap();
        let done = AtomicBool::new(false);

        thread::scope(|scope| {
            scope.spawn(|| {
                for round in 0..200 {
                    backend.replace_all(&blobs[round % 2]).unwrap();
                }
                done.store(true, Ordering::SeqCst);
            });

            let mut reads = 0;
            while !done.load(Ordering::SeqCst) || reads == 0 {
                let blob = backend.read_all().unwrap().unwrap();
                assert_eq!(blob.len(), LEN);
                let first = blob[0];
                assert!(blob.iter().all(|&byte| byte == first), "mixed blob read");
                reads += 1;
            }
        });
    }

    #[test]
    fn file_replace_commits_before_directory_sync() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        let backend = FileBackend::open(&path).unwrap();

        backend.replace_all(b"new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert!(backend.sync_directory().is_ok());
    }

    #[test]
    fn file_second_open_is_locked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let _first = FileBackend::open(&path).unwrap();
        let second = FileBackend::open(&path);
        assert!(matches!(second, Err(StorageError::Locked { .. })));
    }

    #[test]
    fn file_lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        drop(FileBackend::open(&path).unwrap());
        assert!(FileBackend::open(&path).is_ok());
    }

    #[test]
    fn file_failed_replace_is_reported() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let path = data_dir.join("notes.json");

        let backend = FileBackend::open_with_create_dirs(&path).unwrap();
        fs::remove_dir_all(&data_dir).unwrap();

        let result = backend.replace_all(b"lost");
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn file_create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("path").join("notes.json");

        let backend = FileBackend::open_with_create_dirs(&path).unwrap();
        backend.replace_all(b"[]").unwrap();
        assert!(path.exists());
        assert_eq!(backend.path(), path);
    }

    #[test]
    fn sibling_path_appends_suffix() {
        let path = Path::new("/data/notes.json");
        assert_eq!(
            sibling_path(path, LOCK_SUFFIX),
            PathBuf::from("/data/notes.json.lock")
        );
    }
}
