use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::domain::AppError;
use crate::ports::StructureValidator;

/// Structure validator that records the paths it was asked to check.
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeValidator {
    pub failure: Option<String>,
    pub checked: RefCell<Vec<PathBuf>>,
}

#[allow(dead_code)]
impl FakeValidator {
    pub fn passing() -> Self {
        Self::default()
    }

    pub fn failing(output: &str) -> Self {
        Self { failure: Some(output.to_string()), ..Self::default() }
    }
}

impl StructureValidator for FakeValidator {
    fn validate(&self, path: &Path) -> Result<(), AppError> {
        self.checked.borrow_mut().push(path.to_path_buf());
        match &self.failure {
            Some(output) => Err(AppError::ExternalValidation {
                path: path.display().to_string(),
                output: output.clone(),
            }),
            None => Ok(()),
        }
    }
}
