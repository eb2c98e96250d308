//! launchd-plist: build, merge and validate launchd service descriptors.
//!
//! Jobs are configured through a schema-checked [`Builder`], merged with any
//! plist already on disk, rendered to XML, written atomically and confirmed by
//! an external structure validator.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use adapters::{
    DEFAULT_VALIDATOR, FilesystemPlistStore, MinijinjaPlistRenderer, PlutilValidator,
    XmlPlistParser,
};
use app::{
    AppContext,
    commands::{apply, fields, finalize, inspect},
    config::load_manifest,
};

pub use app::commands::apply::JobOutcome;
pub use app::commands::fields::FieldInfo;
pub use app::commands::finalize::{FinalizeOptions, FinalizeReport};
pub use domain::{
    AppError, BlockResult, Builder, Construct, Document, FieldKind, JobDescriptor, Stage, Value,
};

type FilesystemContext =
    AppContext<FilesystemPlistStore, MinijinjaPlistRenderer, XmlPlistParser, PlutilValidator>;

fn filesystem_context(validator: PlutilValidator) -> Result<FilesystemContext, AppError> {
    let renderer = MinijinjaPlistRenderer::new()?;
    Ok(AppContext::new(FilesystemPlistStore, renderer, XmlPlistParser, validator))
}

/// Options for [`apply`].
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Output directory overriding the manifest's `prefix`.
    pub prefix: Option<PathBuf>,
    /// Structure validator program.
    pub validator: OsString,
    /// Run the structure validator after writing.
    pub validate: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self { prefix: None, validator: DEFAULT_VALIDATOR.into(), validate: true }
    }
}

/// Write every job declared in a TOML manifest.
///
/// Relative job names are placed under `options.prefix`, then the manifest's
/// `prefix`, then the current directory. Each job is finalized independently;
/// per-job failures are returned in the outcomes rather than as an error.
pub fn apply(manifest_path: &Path, options: &ApplyOptions) -> Result<Vec<JobOutcome>, AppError> {
    let manifest = load_manifest(manifest_path)?;
    let prefix = match options.prefix.clone().or_else(|| manifest.prefix.clone()) {
        Some(prefix) => prefix,
        None => env::current_dir()?,
    };

    let ctx = filesystem_context(PlutilValidator::new(options.validator.clone()))?;
    let finalize_options = FinalizeOptions { validate: options.validate };
    Ok(apply::execute(&ctx, &manifest, &prefix, finalize_options))
}

/// Merge, write and validate one configured job on the local filesystem.
pub fn finalize(job: JobDescriptor, options: FinalizeOptions) -> Result<FinalizeReport, AppError> {
    let ctx = filesystem_context(PlutilValidator::default())?;
    finalize::execute(&ctx, job, options)
}

/// Parse an existing plist file.
pub fn inspect(path: &Path) -> Result<Document, AppError> {
    let ctx = filesystem_context(PlutilValidator::default())?;
    inspect::execute(&ctx, path)
}

/// Schema fields of one construct, or of all of them.
pub fn fields(construct: Option<Construct>) -> Vec<(Construct, Vec<FieldInfo>)> {
    fields::execute(construct)
}
