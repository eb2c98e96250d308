//! Generic set-or-get dispatch over a construct's schema.
//!
//! A [`Builder`] is scoped to one [`Construct`]. Plain fields are assigned with
//! [`Builder::set`]; nested constructs are filled by configuration blocks that
//! run against a fresh sub-builder and store the produced sub-document under
//! the parent key.

use tracing::trace;

use super::AppError;
use super::document::{Document, Value};
use super::schema::{Construct, FieldKind};
use super::validation::{validate, validate_document};

/// Upper bound on the length of an index-addressable list.
pub const MAX_LIST_LEN: usize = 1024;

/// Result of a configuration block.
pub type BlockResult = Result<(), AppError>;

#[derive(Debug, Clone)]
pub struct Builder {
    construct: Construct,
    doc: Document,
}

impl Builder {
    pub fn new(construct: Construct) -> Self {
        Self { construct, doc: Document::new() }
    }

    pub fn construct(&self) -> Construct {
        self.construct
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Zero arguments reads the stored value, one argument validates and stores it.
    pub fn access(&mut self, field: &str, arg: Option<Value>) -> Result<Option<&Value>, AppError> {
        match arg {
            None => self.get(field),
            Some(value) => {
                let key = self.store(field, value)?;
                Ok(self.doc.get(key))
            }
        }
    }

    /// Currently stored value, or `None` when unset.
    pub fn get(&self, field: &str) -> Result<Option<&Value>, AppError> {
        let (key, _) = self.construct.resolve(field)?;
        Ok(self.doc.get(key))
    }

    /// Validate and store a value, replacing any earlier one.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<&mut Self, AppError> {
        self.store(field, value.into())?;
        Ok(self)
    }

    fn store(&mut self, field: &str, value: Value) -> Result<&'static str, AppError> {
        let (key, kind) = self.construct.resolve(field)?;
        validate(key, kind, &value)?;
        trace!(construct = %self.construct, key, value = %value, "field set");
        self.doc.insert(key, value);
        Ok(key)
    }

    /// Fill a nested document field (`NestedDocument` or `BoolOrNestedDocument`).
    pub fn block<F>(&mut self, field: &str, configure: F) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        let (key, kind) = self.construct.resolve(field)?;
        let construct = match kind {
            FieldKind::NestedDocument(c) | FieldKind::BoolOrNestedDocument(c) => c,
            other => return Err(not_a_block(key, other)),
        };
        let sub = run_block(construct, key, configure)?;
        self.doc.insert(key, sub);
        Ok(self)
    }

    /// Fill one element of an index-addressable list.
    ///
    /// With an index the element is stored at that position, padding earlier
    /// positions with [`Value::Absent`]. Without one it is appended.
    pub fn indexed_block<F>(
        &mut self,
        field: &str,
        index: Option<usize>,
        configure: F,
    ) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        let (key, kind) = self.construct.resolve(field)?;
        let FieldKind::ArrayOfNestedDocuments(construct) = kind else {
            return Err(not_a_block(key, kind));
        };
        let element_field = match index {
            Some(i) => format!("{}[{}]", key, i),
            None => key.to_string(),
        };
        let current_len = self.doc.get(key).and_then(Value::as_array).map_or(0, <[Value]>::len);
        let required_len = match index {
            Some(i) => i.checked_add(1).map(|len| len.max(current_len)),
            None => current_len.checked_add(1),
        };
        if required_len.is_none_or(|len| len > MAX_LIST_LEN) {
            return Err(AppError::shape(
                element_field,
                format!("at most {} entries", MAX_LIST_LEN),
                match index {
                    Some(i) => format!("index {}", i),
                    None => format!("entry {}", current_len),
                },
            ));
        }
        let sub = run_block(construct, &element_field, configure)?;

        let mut items = match self.doc.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        match index {
            Some(i) => {
                if items.len() <= i {
                    items.resize(i + 1, Value::Absent);
                }
                items[i] = Value::Dict(sub);
            }
            None => items.push(Value::Dict(sub)),
        }
        self.doc.insert(key, Value::Array(items));
        Ok(self)
    }

    /// Store a plain boolean entry under `name` in a keyed map field.
    pub fn keyed_value(
        &mut self,
        field: &str,
        name: &str,
        enabled: bool,
    ) -> Result<&mut Self, AppError> {
        let (key, kind) = self.construct.resolve(field)?;
        if !matches!(kind, FieldKind::MapOfBoolOrNestedDocuments(_)) {
            return Err(not_a_block(key, kind));
        }
        self.insert_keyed(key, name, Value::Bool(enabled));
        Ok(self)
    }

    /// Fill a named entry of a keyed map field with a configuration block.
    pub fn keyed_block<F>(
        &mut self,
        field: &str,
        name: &str,
        configure: F,
    ) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        let (key, kind) = self.construct.resolve(field)?;
        let FieldKind::MapOfBoolOrNestedDocuments(construct) = kind else {
            return Err(not_a_block(key, kind));
        };
        let sub = run_block(construct, &format!("{}.{}", key, name), configure)?;
        self.insert_keyed(key, name, Value::Dict(sub));
        Ok(self)
    }

    fn insert_keyed(&mut self, key: &'static str, name: &str, value: Value) {
        let mut entries = match self.doc.remove(key) {
            Some(Value::Dict(entries)) => entries,
            _ => Document::new(),
        };
        entries.insert(name, value);
        self.doc.insert(key, Value::Dict(entries));
    }

    // Job-level sub-blocks under their DSL names. On any other construct these
    // fail with `NotAField` like every other undeclared name.

    pub fn keep_alive<F>(&mut self, configure: F) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        self.block("keep_alive", configure)
    }

    pub fn start_calendar_interval<F>(
        &mut self,
        index: Option<usize>,
        configure: F,
    ) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        self.indexed_block("start_calendar_interval", index, configure)
    }

    pub fn soft_resource_limits<F>(&mut self, configure: F) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        self.block("soft_resource_limits", configure)
    }

    pub fn hard_resource_limits<F>(&mut self, configure: F) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        self.block("hard_resource_limits", configure)
    }

    pub fn mach_service<F>(&mut self, name: &str, configure: F) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        self.keyed_block("mach_services", name, configure)
    }

    pub fn sockets<F>(&mut self, index: Option<usize>, configure: F) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        self.indexed_block("sockets", index, configure)
    }

    pub fn inetd_compatibility<F>(&mut self, configure: F) -> Result<&mut Self, AppError>
    where
        F: FnOnce(&mut Builder) -> BlockResult,
    {
        self.block("inetd_compatibility", configure)
    }
}

fn run_block<F>(construct: Construct, field: &str, configure: F) -> Result<Document, AppError>
where
    F: FnOnce(&mut Builder) -> BlockResult,
{
    let mut sub = Builder::new(construct);
    configure(&mut sub)?;
    let doc = sub.into_document();
    validate_document(construct, field, &doc)?;
    Ok(doc)
}

fn not_a_block(key: &str, kind: FieldKind) -> AppError {
    AppError::shape(key, kind, "configuration block")
}
