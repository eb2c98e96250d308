use crate::domain::{AppError, Document};

/// Serializes a validated document into descriptor text.
pub trait DocumentRenderer {
    /// Render the whole document. Either fully succeeds or returns
    /// [`AppError::Render`]; there is no partial output.
    fn render(&self, document: &Document) -> Result<String, AppError>;
}
