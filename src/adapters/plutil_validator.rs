use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::domain::AppError;
use crate::ports::StructureValidator;

pub const DEFAULT_VALIDATOR: &str = "plutil";

/// Runs `<program> -lint <path>` and treats a non-zero exit as a failure.
#[derive(Debug, Clone)]
pub struct PlutilValidator {
    program: OsString,
}

impl PlutilValidator {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }
}

impl Default for PlutilValidator {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDATOR)
    }
}

impl StructureValidator for PlutilValidator {
    fn validate(&self, path: &Path) -> Result<(), AppError> {
        let output = Command::new(&self.program).arg("-lint").arg(path).output().map_err(|e| {
            AppError::ExternalValidation {
                path: path.display().to_string(),
                output: format!("failed to run {}: {}", self.program.to_string_lossy(), e),
            }
        })?;

        debug!(
            program = %self.program.to_string_lossy(),
            path = %path.display(),
            status = %output.status,
            "structure validation finished"
        );

        if output.status.success() {
            return Ok(());
        }

        // Tool output is surfaced verbatim.
        let mut raw = String::from_utf8_lossy(&output.stdout).into_owned();
        raw.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(AppError::ExternalValidation { path: path.display().to_string(), output: raw })
    }
}
