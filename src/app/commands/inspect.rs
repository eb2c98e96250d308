use std::io;
use std::path::Path;

use crate::app::AppContext;
use crate::domain::{AppError, Document};
use crate::ports::{DocumentRenderer, PlistParser, PlistStore, StructureValidator};

/// Load and parse an existing plist.
pub fn execute<S, R, P, V>(ctx: &AppContext<S, R, P, V>, path: &Path) -> Result<Document, AppError>
where
    S: PlistStore,
    R: DocumentRenderer,
    P: PlistParser,
    V: StructureValidator,
{
    let bytes = ctx.store().read(path)?.ok_or_else(|| {
        AppError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("No plist found at {}", path.display()),
        ))
    })?;
    ctx.parser()
        .parse(&bytes)
        .map_err(|details| AppError::Parse { path: path.display().to_string(), details })
}
