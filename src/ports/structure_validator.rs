use std::path::Path;

use crate::domain::AppError;

/// External checker that confirms a written file is a well-formed plist.
pub trait StructureValidator {
    /// Check the file at `path`. Rejection is reported as
    /// [`AppError::ExternalValidation`] with the checker's raw output.
    fn validate(&self, path: &Path) -> Result<(), AppError>;
}
