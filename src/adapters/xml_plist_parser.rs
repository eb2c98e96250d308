//! XML property-list reader on top of `quick-xml`.
//!
//! Supports `dict`, `array`, `key`, `string`, `integer`, `true` and `false`.
//! Any other value element is rejected rather than dropped, so a merge never
//! silently loses data it could not represent.

use quick_xml::Reader as XmlReader;
use quick_xml::events::Event;

use crate::domain::{Document, Value};
use crate::ports::PlistParser;

/// Strict XML plist parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlPlistParser;

impl PlistParser for XmlPlistParser {
    fn parse(&self, bytes: &[u8]) -> Result<Document, String> {
        let text = std::str::from_utf8(bytes).map_err(|e| format!("not valid UTF-8: {}", e))?;
        Reader::new(text).document()
    }
}

/// Content events with declarations, processing instructions and comments
/// already dropped. CDATA sections arrive as text.
enum Token {
    Open(String),
    Close(String),
    Empty(String),
    Text(String),
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Open,
    Close,
    Empty,
}

#[derive(Debug)]
struct Tag {
    kind: Kind,
    name: String,
}

impl Tag {
    fn is(&self, kind: Kind, name: &str) -> bool {
        self.kind == kind && self.name == name
    }
}

struct Reader<'a> {
    src: &'a str,
    xml: XmlReader<&'a [u8]>,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self { src, xml: XmlReader::from_str(src) }
    }

    fn line(&self) -> usize {
        let pos = usize::try_from(self.xml.buffer_position()).unwrap_or(usize::MAX);
        let pos = pos.min(self.src.len());
        self.src.as_bytes()[..pos].iter().filter(|b| **b == b'\n').count() + 1
    }

    fn error(&self, message: impl AsRef<str>) -> String {
        format!("line {}: {}", self.line(), message.as_ref())
    }

    fn token(&mut self) -> Result<Token, String> {
        loop {
            let event = self.xml.read_event().map_err(|e| self.error(e.to_string()))?;
            let token = match event {
                Event::Start(e) => Token::Open(element_name(e.name().as_ref())),
                Event::End(e) => Token::Close(element_name(e.name().as_ref())),
                Event::Empty(e) => Token::Empty(element_name(e.name().as_ref())),
                Event::Text(e) => {
                    let text = e.unescape().map_err(|err| self.error(err.to_string()))?;
                    Token::Text(text.into_owned())
                }
                Event::CData(e) => {
                    let raw = e.into_inner().into_owned();
                    Token::Text(String::from_utf8(raw).map_err(|err| self.error(err.to_string()))?)
                }
                Event::Eof => Token::End,
                _ => continue,
            };
            return Ok(token);
        }
    }

    /// Next element tag, skipping whitespace between elements.
    fn next_tag(&mut self) -> Result<Tag, String> {
        loop {
            let (kind, name) = match self.token()? {
                Token::Open(name) => (Kind::Open, name),
                Token::Close(name) => (Kind::Close, name),
                Token::Empty(name) => (Kind::Empty, name),
                Token::Text(text) if text.trim().is_empty() => continue,
                Token::Text(text) => {
                    return Err(self.error(format!("unexpected text {:?}", preview(&text))));
                }
                Token::End => return Err(self.error("unexpected end of document")),
            };
            return Ok(Tag { kind, name });
        }
    }

    fn expect_close(&mut self, name: &str) -> Result<(), String> {
        let tag = self.next_tag()?;
        if tag.is(Kind::Close, name) {
            Ok(())
        } else {
            Err(self.error(format!("expected </{}>, found {}", name, describe(&tag))))
        }
    }

    /// Character data up to `</name>`, entities decoded and CDATA unwrapped.
    fn text_until_close(&mut self, name: &str) -> Result<String, String> {
        let mut text = String::new();
        loop {
            match self.token()? {
                Token::Text(chunk) => text.push_str(&chunk),
                Token::Close(found) if found == name => return Ok(text),
                Token::End => return Err(self.error(format!("missing </{}>", name))),
                Token::Open(found) | Token::Empty(found) | Token::Close(found) => {
                    return Err(self.error(format!(
                        "unexpected markup <{}> inside <{}>",
                        found, name
                    )));
                }
            }
        }
    }

    fn document(mut self) -> Result<Document, String> {
        let tag = self.next_tag()?;
        if !tag.is(Kind::Open, "plist") {
            return Err(self.error(format!("expected <plist>, found {}", describe(&tag))));
        }
        let tag = self.next_tag()?;
        let root = match (tag.kind, tag.name.as_str()) {
            (Kind::Open, "dict") => self.dict_body()?,
            (Kind::Empty, "dict") => Document::new(),
            _ => {
                return Err(self.error(format!("expected root <dict>, found {}", describe(&tag))));
            }
        };
        self.expect_close("plist")?;
        loop {
            match self.token()? {
                Token::End => return Ok(root),
                Token::Text(text) if text.trim().is_empty() => {}
                _ => return Err(self.error("trailing content after </plist>")),
            }
        }
    }

    fn dict_body(&mut self) -> Result<Document, String> {
        let mut doc = Document::new();
        loop {
            let tag = self.next_tag()?;
            let key = match (tag.kind, tag.name.as_str()) {
                (Kind::Close, "dict") => return Ok(doc),
                (Kind::Open, "key") => self.text_until_close("key")?,
                (Kind::Empty, "key") => String::new(),
                _ => {
                    return Err(self.error(format!("expected <key>, found {}", describe(&tag))));
                }
            };
            let tag = self.next_tag()?;
            if tag.kind == Kind::Close || tag.name == "key" {
                return Err(self.error(format!(
                    "key {:?} must be followed by a value, found {}",
                    key,
                    describe(&tag)
                )));
            }
            let value = self.value(&tag)?;
            if doc.insert(key.clone(), value).is_some() {
                return Err(self.error(format!("duplicate key {:?}", key)));
            }
        }
    }

    fn array_body(&mut self) -> Result<Vec<Value>, String> {
        let mut items = Vec::new();
        loop {
            let tag = self.next_tag()?;
            match tag.kind {
                Kind::Close if tag.name == "array" => return Ok(items),
                Kind::Open | Kind::Empty => items.push(self.value(&tag)?),
                Kind::Close => {
                    return Err(self.error(format!("unexpected {} in <array>", describe(&tag))));
                }
            }
        }
    }

    fn value(&mut self, tag: &Tag) -> Result<Value, String> {
        match (tag.kind, tag.name.as_str()) {
            (Kind::Open, "dict") => Ok(Value::Dict(self.dict_body()?)),
            (Kind::Empty, "dict") => Ok(Value::Dict(Document::new())),
            (Kind::Open, "array") => Ok(Value::Array(self.array_body()?)),
            (Kind::Empty, "array") => Ok(Value::Array(Vec::new())),
            (Kind::Open, "string") => Ok(Value::String(self.text_until_close("string")?)),
            (Kind::Empty, "string") => Ok(Value::String(String::new())),
            (Kind::Open, "integer") => {
                let text = self.text_until_close("integer")?;
                text.trim()
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| self.error(format!("invalid integer {:?}", text)))
            }
            (Kind::Empty, "true") => Ok(Value::Bool(true)),
            (Kind::Empty, "false") => Ok(Value::Bool(false)),
            (Kind::Open, name @ ("true" | "false")) => {
                self.expect_close(name)?;
                Ok(Value::Bool(name == "true"))
            }
            _ => Err(self.error(format!(
                "unsupported / not recognized plist element {}",
                describe(tag)
            ))),
        }
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn describe(tag: &Tag) -> String {
    match tag.kind {
        Kind::Open => format!("<{}>", tag.name),
        Kind::Close => format!("</{}>", tag.name),
        Kind::Empty => format!("<{}/>", tag.name),
    }
}

fn preview(text: &str) -> String {
    text.chars().take(20).collect()
}
