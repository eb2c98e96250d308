//! Job descriptor: one service definition bound to its target plist path.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::AppError;
use super::builder::{BlockResult, Builder};
use super::document::{Document, Value};
use super::schema::Construct;

const PLIST_EXTENSION: &str = ".plist";

/// Lifecycle position of a job configuration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Empty,
    Populating,
    Validated,
    Serialized,
    Written,
    Confirmed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Empty => "empty",
            Stage::Populating => "populating",
            Stage::Validated => "validated",
            Stage::Serialized => "serialized",
            Stage::Written => "written",
            Stage::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}

/// A service definition being populated.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    path: PathBuf,
    default_label: String,
    builder: Builder,
}

impl JobDescriptor {
    /// Declare a job by name.
    ///
    /// `.plist` is appended unless present. Absolute names are used as-is,
    /// relative names are placed under `prefix`.
    pub fn new(prefix: &Path, name: &str) -> Result<Self, AppError> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.ends_with('/') {
            return Err(AppError::InvalidJobName(name.to_string()));
        }

        let file = if trimmed.ends_with(PLIST_EXTENSION) {
            trimmed.to_string()
        } else {
            format!("{}{}", trimmed, PLIST_EXTENSION)
        };
        let candidate = Path::new(&file);
        let path = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            if candidate.components().any(|c| matches!(c, Component::ParentDir)) {
                return Err(AppError::InvalidJobName(name.to_string()));
            }
            prefix.join(candidate)
        };

        let default_label = path
            .file_name()
            .and_then(|f| f.to_str())
            .and_then(|f| f.strip_suffix(PLIST_EXTENSION))
            .filter(|label| !label.is_empty())
            .ok_or_else(|| AppError::InvalidJobName(name.to_string()))?
            .to_string();

        Ok(Self { path, default_label, builder: Builder::new(Construct::Job) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path segment of the target file.
    pub fn filename(&self) -> &str {
        self.path.file_name().and_then(|f| f.to_str()).unwrap_or_default()
    }

    /// Label derived from the filename, used when none is configured.
    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Configured label, falling back to the filename-derived one.
    pub fn label(&self) -> &str {
        self.builder
            .document()
            .get("Label")
            .and_then(Value::as_str)
            .unwrap_or(&self.default_label)
    }

    pub fn stage(&self) -> Stage {
        if self.builder.document().is_empty() { Stage::Empty } else { Stage::Populating }
    }

    pub fn document(&self) -> &Document {
        self.builder.document()
    }

    pub fn builder(&mut self) -> &mut Builder {
        &mut self.builder
    }

    /// Run a configuration block against the job-level builder.
    pub fn configure<F>(&mut self, configure: F) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        configure(&mut self.builder)?;
        Ok(self)
    }

    /// Check completeness and produce the document to persist.
    ///
    /// Requires at least one program argument. Fills `Label` from the filename
    /// when the configuration did not set one, and turns unconfigured list
    /// slots into empty dictionaries.
    pub fn validate(self) -> Result<ValidatedJob, AppError> {
        let has_arguments = self
            .builder
            .document()
            .get("ProgramArguments")
            .and_then(Value::as_array)
            .is_some_and(|args| !args.is_empty());
        if !has_arguments {
            return Err(AppError::IncompleteDocument { path: self.path.display().to_string() });
        }

        let label = self.label().to_string();
        let mut document = self.builder.into_document();
        if !document.contains_key("Label") {
            document.insert("Label", label.clone());
        }
        document.fill_placeholders();

        Ok(ValidatedJob { path: self.path, label, document })
    }
}

/// A job that passed the completeness check and is ready to merge and persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedJob {
    pub path: PathBuf,
    pub label: String,
    pub document: Document,
}
