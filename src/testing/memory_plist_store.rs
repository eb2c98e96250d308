use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::AppError;
use crate::ports::PlistStore;

/// In-memory plist store for testing.
#[derive(Default)]
#[allow(dead_code)]
pub struct MemoryPlistStore {
    pub files: RefCell<HashMap<PathBuf, String>>,
    pub writes: Cell<usize>,
    pub locks: Cell<usize>,
}

#[allow(dead_code)]
impl MemoryPlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files.borrow_mut().insert(path.into(), content.to_string());
        self
    }

    pub fn content(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }
}

impl PlistStore for MemoryPlistStore {
    type Guard = ();

    fn lock(&self, _path: &Path) -> Result<(), AppError> {
        self.locks.set(self.locks.get() + 1);
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.files.borrow().get(path).map(|content| content.as_bytes().to_vec()))
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<(), AppError> {
        self.writes.set(self.writes.get() + 1);
        self.files.borrow_mut().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
