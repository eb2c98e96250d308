//! Finalization pipeline for one job descriptor.
//!
//! `Validated -> Serialized -> Written -> Confirmed`, run under an exclusive
//! lock on the target path. The lock is released on every exit path.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::app::AppContext;
use crate::domain::{AppError, JobDescriptor, MergeDecision, Stage, prepare};
use crate::ports::{DocumentRenderer, PlistParser, PlistStore, StructureValidator};

/// Options for the finalize command.
#[derive(Debug, Clone, Copy)]
pub struct FinalizeOptions {
    /// Run the external structure validator after writing.
    pub validate: bool,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// Outcome of finalizing one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeReport {
    pub path: PathBuf,
    pub label: String,
    /// Last stage reached.
    pub stage: Stage,
    /// Whether the target file was (re)written.
    pub written: bool,
}

/// Execute the finalize pipeline.
pub fn execute<S, R, P, V>(
    ctx: &AppContext<S, R, P, V>,
    job: JobDescriptor,
    options: FinalizeOptions,
) -> Result<FinalizeReport, AppError>
where
    S: PlistStore,
    R: DocumentRenderer,
    P: PlistParser,
    V: StructureValidator,
{
    let validated = job.validate()?;
    let path = validated.path;
    debug!(
        path = %path.display(),
        label = %validated.label,
        stage = %Stage::Validated,
        "job validated"
    );

    let _guard = ctx.store().lock(&path)?;

    let existing = match ctx.store().read(&path)? {
        Some(bytes) => Some(ctx.parser().parse(&bytes).map_err(|details| AppError::Parse {
            path: path.display().to_string(),
            details,
        })?),
        None => None,
    };

    let decision = prepare(existing.as_ref(), &validated.document).map_err(|e| {
        AppError::ExistingContent { path: path.display().to_string(), source: Box::new(e) }
    })?;
    let document = match decision {
        MergeDecision::Unchanged => {
            info!(path = %path.display(), "plist unchanged, skipping write");
            return Ok(FinalizeReport {
                path,
                label: validated.label,
                stage: Stage::Validated,
                written: false,
            });
        }
        MergeDecision::Create(document) => {
            debug!(path = %path.display(), "creating new plist");
            document
        }
        MergeDecision::Rewrite(document) => {
            debug!(path = %path.display(), "merging into existing plist");
            document
        }
    };

    let rendered = ctx.renderer().render(&document)?;
    debug!(path = %path.display(), stage = %Stage::Serialized, "plist rendered");

    ctx.store().write_atomic(&path, &rendered)?;
    debug!(path = %path.display(), stage = %Stage::Written, "plist written");

    if !options.validate {
        info!(path = %path.display(), "wrote plist without structure validation");
        return Ok(FinalizeReport {
            path,
            label: validated.label,
            stage: Stage::Written,
            written: true,
        });
    }

    // On failure the written file stays in place for inspection.
    ctx.validator().validate(&path)?;
    info!(path = %path.display(), label = %validated.label, "plist written and validated");

    Ok(FinalizeReport { path, label: validated.label, stage: Stage::Confirmed, written: true })
}
