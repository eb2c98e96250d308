//! Shape validation of values against their declared [`FieldKind`].
//!
//! Nested documents are checked recursively against the construct that owns
//! them, so a document that passed validation only ever holds declared keys.

use super::document::{Document, Value};
use super::schema::{Construct, FieldKind};
use super::AppError;

/// Check `value` against `kind`. `field` names the key in any error.
pub fn validate(field: &str, kind: FieldKind, value: &Value) -> Result<(), AppError> {
    match (kind, value) {
        (FieldKind::String, Value::String(_))
        | (FieldKind::Bool, Value::Bool(_))
        | (FieldKind::Integer, Value::Integer(_)) => Ok(()),

        (FieldKind::ArrayOfStrings, _) => validate_array_of_strings(field, value),

        (FieldKind::MapOfBools, Value::Dict(entries)) => {
            validate_map_entries(field, kind, entries, |v| matches!(v, Value::Bool(_)))
        }
        (FieldKind::MapOfStrings, Value::Dict(entries)) => {
            validate_map_entries(field, kind, entries, |v| matches!(v, Value::String(_)))
        }

        (FieldKind::BoolOrStringOrArrayOfStrings, Value::Bool(_) | Value::String(_)) => Ok(()),
        (FieldKind::BoolOrStringOrArrayOfStrings, Value::Array(_)) => {
            validate_array_of_strings(field, value)
        }

        (FieldKind::BoolOrNestedDocument(_), Value::Bool(_)) => Ok(()),
        (FieldKind::BoolOrNestedDocument(construct), Value::Dict(doc))
        | (FieldKind::NestedDocument(construct), Value::Dict(doc)) => {
            validate_document(construct, field, doc)
        }

        (FieldKind::ArrayOfNestedDocuments(construct), Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                let item_field = format!("{}[{}]", field, index);
                match item {
                    Value::Absent => {}
                    Value::Dict(doc) => validate_document(construct, &item_field, doc)?,
                    other => return Err(AppError::shape(item_field, kind, other.describe())),
                }
            }
            Ok(())
        }

        (FieldKind::MapOfBoolOrNestedDocuments(construct), Value::Dict(entries)) => {
            for (name, entry) in entries.iter() {
                let entry_field = format!("{}.{}", field, name);
                match entry {
                    Value::Bool(_) => {}
                    Value::Dict(doc) => validate_document(construct, &entry_field, doc)?,
                    other => return Err(AppError::shape(entry_field, kind, other.describe())),
                }
            }
            Ok(())
        }

        (_, other) => Err(AppError::shape(field, kind, other.describe())),
    }
}

/// Validate every entry of a sub-document against `construct`'s schema.
///
/// Keys must be given in canonical spelling.
pub fn validate_document(
    construct: Construct,
    field: &str,
    doc: &Document,
) -> Result<(), AppError> {
    validate_entries(construct, doc, |key| format!("{}.{}", field, key))
}

/// Validate a top-level document, such as a job read back from disk.
pub fn validate_root(construct: Construct, doc: &Document) -> Result<(), AppError> {
    validate_entries(construct, doc, str::to_string)
}

fn validate_entries(
    construct: Construct,
    doc: &Document,
    path: impl Fn(&str) -> String,
) -> Result<(), AppError> {
    for (key, value) in doc.iter() {
        let kind = construct
            .fields()
            .iter()
            .find(|(declared, _)| *declared == key)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| AppError::NotAField {
                construct: construct.name().to_string(),
                field: path(key),
            })?;
        validate(&path(key), kind, value)?;
    }
    Ok(())
}

fn validate_array_of_strings(field: &str, value: &Value) -> Result<(), AppError> {
    let Value::Array(items) = value else {
        return Err(AppError::shape(field, FieldKind::ArrayOfStrings, value.describe()));
    };
    for (index, item) in items.iter().enumerate() {
        if !matches!(item, Value::String(_)) {
            return Err(AppError::shape(
                format!("{}[{}]", field, index),
                FieldKind::String,
                item.describe(),
            ));
        }
    }
    Ok(())
}

fn validate_map_entries(
    field: &str,
    kind: FieldKind,
    entries: &Document,
    accepts: impl Fn(&Value) -> bool,
) -> Result<(), AppError> {
    for (key, entry) in entries.iter() {
        if !accepts(entry) {
            return Err(AppError::shape(format!("{}.{}", field, key), kind, entry.describe()));
        }
    }
    Ok(())
}
