use std::io;

use thiserror::Error;

/// Library-wide error type for launchd-plist operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// An assignment targeted a name that the active construct does not declare.
    #[error("'{field}' is not a field of {construct}")]
    NotAField { construct: String, field: String },

    /// A value's runtime shape did not match its field's declared kind.
    #[error("Key: {field}, value: {actual}. Should be: {expected}")]
    Shape { field: String, expected: String, actual: String },

    /// Finalization attempted without program arguments.
    #[error("Not enough information to generate plist \"{path}\": no program arguments given")]
    IncompleteDocument { path: String },

    /// An existing descriptor on disk could not be parsed.
    #[error("Failed to parse existing plist {path}: {details}")]
    Parse { path: String, details: String },

    /// An existing descriptor holds keys or values its schema does not allow.
    #[error("Existing plist {path} cannot be merged: {source}")]
    ExistingContent { path: String, source: Box<AppError> },

    /// The renderer met a value it cannot serialize. Indicates a validation bug.
    #[error("Internal error rendering plist: {0}")]
    Render(String),

    /// The external structural checker rejected the written file.
    #[error("plist validation failed for {path}:\n{output}")]
    ExternalValidation { path: String, output: String },

    /// The per-path lock could not be acquired.
    #[error("Failed to lock {path}: {details}")]
    Lock { path: String, details: String },

    /// Job name cannot be turned into a descriptor path.
    #[error("Invalid job name '{0}'")]
    InvalidJobName(String),

    /// Construct name is not one of the known schema scopes.
    #[error(
        "Unknown construct '{0}': must be one of job, keep-alive, calendar-interval, resource-limits, mach-service, socket, inetd-compatibility"
    )]
    UnknownConstruct(String),

    /// Manifest is structurally unusable.
    #[error("Invalid manifest: {0}")]
    Manifest(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl AppError {
    pub fn shape(
        field: impl Into<String>,
        expected: impl ToString,
        actual: impl Into<String>,
    ) -> Self {
        AppError::Shape {
            field: field.into(),
            expected: expected.to_string(),
            actual: actual.into(),
        }
    }

    pub fn manifest<S: Into<String>>(message: S) -> Self {
        AppError::Manifest(message.into())
    }

    /// Provide an `io::ErrorKind`-like view for callers expecting legacy behavior.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::NotAField { .. }
            | AppError::Shape { .. }
            | AppError::IncompleteDocument { .. }
            | AppError::Parse { .. }
            | AppError::InvalidJobName(_)
            | AppError::UnknownConstruct(_)
            | AppError::Manifest(_)
            | AppError::TomlParse(_) => io::ErrorKind::InvalidInput,
            AppError::ExternalValidation { .. } | AppError::ExistingContent { .. } => {
                io::ErrorKind::InvalidData
            }
            AppError::Lock { .. } => io::ErrorKind::WouldBlock,
            AppError::Render(_) => io::ErrorKind::Other,
        }
    }
}
