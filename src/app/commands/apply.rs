use std::path::Path;

use tracing::warn;

use super::finalize::{self, FinalizeOptions, FinalizeReport};
use crate::app::AppContext;
use crate::app::config::{Manifest, build_job};
use crate::domain::AppError;
use crate::ports::{DocumentRenderer, PlistParser, PlistStore, StructureValidator};

/// Result of one manifest job.
#[derive(Debug)]
pub struct JobOutcome {
    pub name: String,
    pub result: Result<FinalizeReport, AppError>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Build and finalize every job in the manifest.
///
/// Jobs are independent: a failure is recorded in its outcome and the
/// remaining jobs still run.
pub fn execute<S, R, P, V>(
    ctx: &AppContext<S, R, P, V>,
    manifest: &Manifest,
    prefix: &Path,
    options: FinalizeOptions,
) -> Vec<JobOutcome>
where
    S: PlistStore,
    R: DocumentRenderer,
    P: PlistParser,
    V: StructureValidator,
{
    manifest
        .jobs
        .iter()
        .map(|entry| {
            let result =
                build_job(prefix, entry).and_then(|job| finalize::execute(ctx, job, options));
            if let Err(e) = &result {
                warn!(job = %entry.name, error = %e, "job failed");
            }
            JobOutcome { name: entry.name.clone(), result }
        })
        .collect()
}
