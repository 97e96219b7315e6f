//! Typed view of a JSON (Hyper-)Schema document.
//!
//! Only the keywords that shape the record tree are kept: `type`, `$ref`,
//! `definitions` and `properties`. Every other keyword is ignored on load.
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LoadError, ReferenceError};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// JSON Schema primitive type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveType {
    Null,
    Integer,
    String,
    Object,
    Array,
    Boolean,
    Number,
}

/// One schema node. Maps are sorted so every walk over them is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Schema {
    #[serde(default, rename = "type", deserialize_with = "one_or_many")]
    pub types: Vec<PrimitiveType>,
    #[serde(default, rename = "$ref")]
    pub reference: Option<String>,
    #[serde(default, alias = "$defs")]
    pub definitions: BTreeMap<String, Schema>,
    #[serde(default)]
    pub properties: BTreeMap<String, Schema>,
}

/// A loaded document: the typed root plus the raw JSON that `$ref` pointers
/// are evaluated against. Dereferenced targets are memoized by pointer.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    origin: String,
    raw: Value,
    root: Schema,
    targets: RefCell<BTreeMap<String, Rc<Schema>>>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Number => "number",
        }
    }
}

impl FromStr for PrimitiveType {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "null" => Ok(Self::Null),
            "integer" => Ok(Self::Integer),
            "string" => Ok(Self::String),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            "boolean" => Ok(Self::Boolean),
            "number" => Ok(Self::Number),
            other => Err(format!("unknown type tag `{other}`")),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Schema {
    pub fn has_type(&self, ty: PrimitiveType) -> bool {
        self.types.contains(&ty)
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

impl SchemaDocument {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_with_origin(&source, path.display().to_string())
    }

    pub fn parse(source: &str) -> Result<Self, LoadError> {
        Self::parse_with_origin(source, "<input>".to_string())
    }

    pub fn from_value(raw: Value) -> Result<Self, LoadError> {
        Self::with_origin(raw, "<value>".to_string())
    }

    fn parse_with_origin(source: &str, origin: String) -> Result<Self, LoadError> {
        let raw = serde_json::from_str::<Value>(source).map_err(|source| LoadError::Json {
            origin: origin.clone(),
            source,
        })?;
        Self::with_origin(raw, origin)
    }

    fn with_origin(raw: Value, origin: String) -> Result<Self, LoadError> {
        let root = deserialize_with_path::<Schema>(raw.clone()).map_err(|message| {
            LoadError::Schema { origin: origin.clone(), message }
        })?;
        Ok(Self { origin, raw, root, targets: RefCell::default() })
    }

    pub fn root(&self) -> &Schema {
        &self.root
    }

    /// Where the document came from (file path or a placeholder).
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Dereference a document-local `$ref` (`#`, `#/definitions/x`, ...).
    /// Sloppy fragments without the leading slash (`#definitions/x`) are
    /// accepted as well.
    pub fn resolve(&self, reference: &str) -> Result<Rc<Schema>, ReferenceError> {
        let fragment = reference
            .strip_prefix('#')
            .ok_or(ReferenceError::Unsupported)?;
        let pointer = if fragment.is_empty() || fragment.starts_with('/') {
            fragment.to_string()
        } else {
            format!("/{fragment}")
        };
        if let Some(target) = self.targets.borrow().get(&pointer) {
            return Ok(Rc::clone(target));
        }
        let node = self
            .raw
            .pointer(&pointer)
            .ok_or_else(|| ReferenceError::Missing(pointer.clone()))?;
        let target = Rc::new(
            deserialize_with_path::<Schema>(node.clone()).map_err(ReferenceError::Malformed)?,
        );
        self.targets.borrow_mut().insert(pointer, Rc::clone(&target));
        Ok(target)
    }

    /// Number of distinct pointers dereferenced so far.
    pub fn cached_targets(&self) -> usize {
        self.targets.borrow().len()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Deserialize with JSON-path context in error messages.
fn deserialize_with_path<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}

/// `"type"` is either a single tag or a list of tags.
fn one_or_many<'de, D>(de: D) -> Result<Vec<PrimitiveType>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let tags = match OneOrMany::deserialize(de)? {
        OneOrMany::One(tag) => vec![tag],
        OneOrMany::Many(tags) => tags,
    };
    tags.iter()
        .map(|tag| tag.parse::<PrimitiveType>().map_err(D::Error::custom))
        .collect()
}

// ------------------------------- Tests ------------------------------------ //
