//! Declarative attribute schemas.
//!
//! A block's attributes are described by a static table of [`FieldDef`]s.
//! Each field has a kind, an optional default, and optionally a markup
//! [`Source`] saying where the extractor recovers it from saved HTML.
//! Fields without a source live in the block comment delimiter instead.
//!
//! Fields are tagged with the [`SchemaVersion`] that introduced them; a
//! schema viewed [`at`](Schema::at) an older version simply omits the
//! newer fields, and missing fields are default-filled on read.

mod coerce;

use std::fmt;

use serde_json::{Map, Value};

pub use coerce::{Coerced, CoercionError, coerce_json, coerce_markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// Image, alignment, max width, content and colors.
    V1 = 1,
    /// Adds link settings, the hover effect, image dimensions and size slug.
    V2 = 2,
}

impl SchemaVersion {
    pub const LATEST: SchemaVersion = SchemaVersion::V2;

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(SchemaVersion::V1),
            2 => Some(SchemaVersion::V2),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// Non-negative integer.
    Integer,
    Boolean,
    /// One of a closed set of strings; anything else reads as absent.
    Enum(&'static [&'static str]),
    /// CSS length, see [`crate::Length`].
    Length,
    Object,
}

impl FieldKind {
    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Integer => "a non-negative integer",
            FieldKind::Boolean => "a boolean",
            FieldKind::Enum(_) => "one of the allowed values",
            FieldKind::Length => "a CSS length",
            FieldKind::Object => "an object",
        }
    }
}

/// What to read from the element a source selector matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRead {
    Attribute(&'static str),
    Text,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub selector: &'static str,
    pub read: SourceRead,
}

impl Source {
    pub const fn attribute(selector: &'static str, attribute: &'static str) -> Self {
        Self {
            selector,
            read: SourceRead::Attribute(attribute),
        }
    }

    pub const fn text(selector: &'static str) -> Self {
        Self {
            selector,
            read: SourceRead::Text,
        }
    }

    pub const fn html(selector: &'static str) -> Self {
        Self {
            selector,
            read: SourceRead::Html,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Str(&'static str),
    Bool(bool),
    Int(u64),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Str(s) => Value::String(s.to_string()),
            DefaultValue::Bool(b) => Value::Bool(b),
            DefaultValue::Int(n) => Value::from(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: Option<DefaultValue>,
    pub source: Option<Source>,
    pub since: SchemaVersion,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            default: None,
            source: None,
            since: SchemaVersion::V1,
        }
    }

    pub const fn default(self, default: DefaultValue) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub const fn source(self, source: Source) -> Self {
        Self {
            source: Some(source),
            ..self
        }
    }

    pub const fn since(self, since: SchemaVersion) -> Self {
        Self { since, ..self }
    }

    pub fn is_sourced(&self) -> bool {
        self.source.is_some()
    }

    pub fn default_value(&self) -> Option<Value> {
        self.default.map(DefaultValue::to_value)
    }
}

/// A block's attribute table viewed at one schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    block_name: &'static str,
    fields: &'static [FieldDef],
    version: SchemaVersion,
}

impl Schema {
    pub const fn new(block_name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self {
            block_name,
            fields,
            version: SchemaVersion::LATEST,
        }
    }

    /// The same table restricted to fields that existed at `version`.
    pub fn at(self, version: SchemaVersion) -> Self {
        Self { version, ..self }
    }

    pub fn block_name(&self) -> &'static str {
        self.block_name
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static FieldDef> + '_ {
        let version = self.version;
        self.fields.iter().filter(move |f| f.since <= version)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields().find(|f| f.name == name)
    }

    pub fn sourced_fields(&self) -> impl Iterator<Item = &'static FieldDef> + '_ {
        self.fields().filter(|f| f.is_sourced())
    }

    pub fn delimiter_fields(&self) -> impl Iterator<Item = &'static FieldDef> + '_ {
        self.fields().filter(|f| !f.is_sourced())
    }

    /// The default record: every field that declares a default.
    pub fn defaults(&self) -> Map<String, Value> {
        self.fields()
            .filter_map(|f| f.default_value().map(|v| (f.name.to_string(), v)))
            .collect()
    }

    /// Attributes persisted in the comment delimiter: unsourced fields whose
    /// value is valid for their kind and differs from the default.
    pub fn delimiter_attributes(&self, values: &Map<String, Value>) -> Map<String, Value> {
        let mut out = Map::new();
        for field in self.delimiter_fields() {
            let Some(value) = values.get(field.name) else {
                continue;
            };
            let Ok(Coerced::Value(value)) = coerce_json(field.kind, value) else {
                continue;
            };
            if field.default_value().as_ref() == Some(&value) {
                continue;
            }
            out.insert(field.name.to_string(), value);
        }
        out
    }

    /// Read comment-delimiter attributes into `values`.
    ///
    /// Unknown keys and keys belonging to sourced fields are skipped;
    /// values of the wrong kind are reported and leave the default in place.
    pub fn apply_delimiter(
        &self,
        delimiter: &Map<String, Value>,
        values: &mut Map<String, Value>,
    ) -> Vec<(&'static str, CoercionError)> {
        let mut errors = Vec::new();
        for (key, value) in delimiter {
            let Some(field) = self.field(key) else {
                log::debug!("{}: ignoring unknown attribute `{key}`", self.block_name);
                continue;
            };
            if field.is_sourced() {
                log::debug!("{}: `{key}` is read from markup, ignoring delimiter value", self.block_name);
                continue;
            }
            match coerce_json(field.kind, value) {
                Ok(Coerced::Value(value)) => {
                    values.insert(field.name.to_string(), value);
                }
                Ok(Coerced::Absent) => {
                    log::warn!("{}: unrecognised value for `{key}`: {value}", self.block_name);
                }
                Err(error) => errors.push((field.name, error)),
            }
        }
        errors
    }
}
