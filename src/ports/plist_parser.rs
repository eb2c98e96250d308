use crate::domain::Document;

/// Parses persisted descriptor bytes back into a document.
pub trait PlistParser {
    /// Parse `bytes`. The error carries a human-readable reason; callers attach
    /// the file path.
    fn parse(&self, bytes: &[u8]) -> Result<Document, String>;
}
