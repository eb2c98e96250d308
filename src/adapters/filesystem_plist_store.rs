use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::AppError;
use crate::ports::PlistStore;

/// Plist persistence on the local filesystem.
///
/// Writes go through a temp file in the target directory followed by a rename,
/// so readers see either the old or the new file and never a partial one.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemPlistStore;

/// Mode given to descriptors that do not exist yet.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Exclusive advisory lock on a target path, released on drop.
///
/// The sidecar file is left in place after release. Unlinking it would let a
/// waiting process and a new one hold locks on different inodes.
#[derive(Debug)]
pub struct PathLock {
    file: File,
    lock_path: PathBuf,
}

impl Drop for PathLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!(lock = %self.lock_path.display(), error = %e, "failed to release lock");
        }
    }
}

/// Sidecar lock file: `.<name>.lock` next to the target.
fn lock_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{}.lock", name))
}

/// Permissions the replacement file should carry: the current file's, or the
/// usual descriptor mode for a new one.
fn target_permissions(path: &Path) -> io::Result<Option<Permissions>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(new_file_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

impl PlistStore for FilesystemPlistStore {
    type Guard = PathLock;

    fn lock(&self, path: &Path) -> Result<PathLock, AppError> {
        let lock_path = lock_path_for(path);
        let lock_err = |e: io::Error| AppError::Lock {
            path: path.display().to_string(),
            details: e.to_string(),
        };

        fs::create_dir_all(parent_dir(path)).map_err(lock_err)?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(lock_err)?;
        file.lock_exclusive().map_err(lock_err)?;

        debug!(lock = %lock_path.display(), "acquired lock");
        Ok(PathLock { file, lock_path })
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, AppError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<(), AppError> {
        let parent = parent_dir(path);
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(content.as_bytes())?;
        if let Some(permissions) = target_permissions(path)? {
            temp.as_file().set_permissions(permissions)?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| AppError::Io(e.error))?;

        debug!(path = %path.display(), bytes = content.len(), "wrote plist");
        Ok(())
    }
}
