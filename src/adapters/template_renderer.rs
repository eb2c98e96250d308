//! Minijinja-backed plist renderer.
//!
//! The document is lowered into a tree of tagged nodes that the embedded
//! templates walk recursively, emitting one key element followed by exactly
//! one typed value element per entry.

use include_dir::{Dir, include_dir};
use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;

use crate::domain::{AppError, Document, Value};
use crate::ports::DocumentRenderer;

static PLIST_TEMPLATES: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/plist");

const ROOT_TEMPLATE: &str = "plist.xml.j2";

#[derive(Debug, Serialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
enum Node {
    String { text: String },
    Integer { number: i64 },
    True,
    False,
    Array { items: Vec<Node> },
    Dict { entries: Vec<Entry> },
}

#[derive(Debug, Serialize)]
struct Entry {
    key: String,
    node: Node,
}

fn lower_document(document: &Document, path: &str) -> Result<Node, AppError> {
    let entries = document
        .iter()
        .map(|(key, value)| {
            let child_path =
                if path.is_empty() { key.to_string() } else { format!("{}.{}", path, key) };
            if matches!(value, Value::Absent) {
                return Err(AppError::Render(format!("absent value stored under {}", child_path)));
            }
            Ok(Entry { key: key.to_string(), node: lower_value(value, &child_path)? })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::Dict { entries })
}

fn lower_value(value: &Value, path: &str) -> Result<Node, AppError> {
    Ok(match value {
        Value::String(text) => Node::String { text: text.clone() },
        Value::Integer(number) => Node::Integer { number: *number },
        Value::Bool(true) => Node::True,
        Value::Bool(false) => Node::False,
        Value::Array(items) => Node::Array {
            items: items
                .iter()
                .enumerate()
                .map(|(i, item)| lower_value(item, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()?,
        },
        Value::Dict(doc) => lower_document(doc, path)?,
        // Unconfigured list slots become empty dictionaries.
        Value::Absent => Node::Dict { entries: Vec::new() },
    })
}

/// Escape text content for XML element bodies.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn build_template_environment() -> Result<Environment<'static>, AppError> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("xml_escape", |text: &str| -> String { xml_escape(text) });

    for file in PLIST_TEMPLATES.files() {
        let name = file.path().to_str().ok_or_else(|| {
            AppError::Render(format!("Template name is not UTF-8: {}", file.path().display()))
        })?;
        let source = file
            .contents_utf8()
            .ok_or_else(|| AppError::Render(format!("Template {} is not UTF-8", name)))?;
        env.add_template(name, source).map_err(|e| {
            AppError::Render(format!("Failed to register template '{}': {}", name, e))
        })?;
    }

    Ok(env)
}

/// Renders documents as XML property lists.
pub struct MinijinjaPlistRenderer {
    env: Environment<'static>,
}

impl MinijinjaPlistRenderer {
    pub fn new() -> Result<Self, AppError> {
        Ok(Self { env: build_template_environment()? })
    }
}

impl DocumentRenderer for MinijinjaPlistRenderer {
    fn render(&self, document: &Document) -> Result<String, AppError> {
        let root = lower_document(document, "")?;
        let template = self.env.get_template(ROOT_TEMPLATE).map_err(|e| {
            AppError::Render(format!("Failed to load template '{}': {}", ROOT_TEMPLATE, e))
        })?;
        template.render(context! { root => root }).map_err(|e| {
            AppError::Render(format!("Failed to render template '{}': {}", ROOT_TEMPLATE, e))
        })
    }
}
