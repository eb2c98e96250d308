pub mod builder;
pub mod document;
pub mod error;
pub mod job;
pub mod merge;
pub mod naming;
pub mod schema;
pub mod validation;

pub use builder::{BlockResult, Builder};
pub use document::{Document, Value};
pub use error::AppError;
pub use job::{JobDescriptor, Stage, ValidatedJob};
pub use merge::{MergeDecision, prepare};
pub use schema::{Construct, FieldKind};
