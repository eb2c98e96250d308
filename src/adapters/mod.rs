pub mod filesystem_plist_store;
pub mod plutil_validator;
pub mod template_renderer;
pub mod xml_plist_parser;

pub use filesystem_plist_store::{FilesystemPlistStore, PathLock};
pub use plutil_validator::{DEFAULT_VALIDATOR, PlutilValidator};
pub use template_renderer::MinijinjaPlistRenderer;
pub use xml_plist_parser::XmlPlistParser;
