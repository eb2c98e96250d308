//! Merge decision between a freshly built document and the one already on disk.

use super::AppError;
use super::document::Document;
use super::schema::Construct;
use super::validation::validate_root;

/// What finalization should do with the target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDecision {
    /// No file exists yet; write the new document as-is.
    Create(Document),
    /// The existing file needs rewriting with this merged document.
    Rewrite(Document),
    /// Re-applying the configuration would not change the existing file.
    Unchanged,
}

impl MergeDecision {
    /// Document to persist, if any.
    pub fn document(&self) -> Option<&Document> {
        match self {
            MergeDecision::Create(doc) | MergeDecision::Rewrite(doc) => Some(doc),
            MergeDecision::Unchanged => None,
        }
    }
}

/// Overlay every key of `incoming` on `existing`.
///
/// Keys only present in `existing` survive, so `existing` must itself be a
/// valid job document. The result is `Unchanged` when the overlay reproduces
/// `existing` exactly, which covers a matching label with no effective field
/// change.
pub fn prepare(
    existing: Option<&Document>,
    incoming: &Document,
) -> Result<MergeDecision, AppError> {
    let Some(existing) = existing else {
        return Ok(MergeDecision::Create(incoming.clone()));
    };
    validate_root(Construct::Job, existing)?;

    let mut merged = existing.clone();
    merged.overlay(incoming);

    Ok(if &merged == existing {
        MergeDecision::Unchanged
    } else {
        MergeDecision::Rewrite(merged)
    })
}
