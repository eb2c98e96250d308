mod document_renderer;
mod plist_parser;
mod plist_store;
mod structure_validator;

pub use document_renderer::DocumentRenderer;
pub use plist_parser::PlistParser;
pub use plist_store::PlistStore;
pub use structure_validator::StructureValidator;
