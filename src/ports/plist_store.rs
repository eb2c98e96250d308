//! Persistence of descriptor files.

use std::path::Path;

use crate::domain::AppError;

/// Port for reading and writing descriptor files.
pub trait PlistStore {
    /// Guard holding exclusive access to one path. Released on drop.
    type Guard;

    /// Acquire exclusive access to `path` for a load/write/validate sequence.
    fn lock(&self, path: &Path) -> Result<Self::Guard, AppError>;

    /// Read the file, or `None` when it does not exist.
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, AppError>;

    /// Replace the file's content so readers see either the old or the new text.
    fn write_atomic(&self, path: &Path, content: &str) -> Result<(), AppError>;
}
