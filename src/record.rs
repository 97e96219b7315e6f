// Strongly-typed record tree handed to the renderers. No serde_json::Value here.
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::schema::PrimitiveType;

/// Target-language primitive a leaf field maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Bool,
    Struct,                  // placeholder for arrays and objects kept as leaves
}

/// One generated type. `depth` is bookkeeping only (indentation, recursion
/// limit); it plays no part in identity beyond equality checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub depth: usize,
    pub fields: BTreeMap<String, FieldType>,   // sorted for deterministic codegen
    pub children: Vec<Record>,
}

impl FieldType {
    /// `None` for `null`, which carries no shape of its own.
    pub fn from_primitive(ty: PrimitiveType) -> Option<Self> {
        match ty {
            PrimitiveType::String => Some(Self::String),
            PrimitiveType::Integer | PrimitiveType::Number => Some(Self::Integer),
            PrimitiveType::Boolean => Some(Self::Bool),
            PrimitiveType::Array | PrimitiveType::Object => Some(Self::Struct),
            PrimitiveType::Null => None,
        }
    }

    /// Go spelling, used by the struct renderer.
    pub fn go_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "int",
            Self::Bool => "bool",
            Self::Struct => "struct",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.go_name())
    }
}

impl Record {
    pub fn new(name: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            depth,
            fields: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    pub fn child(&self, name: &str) -> Option<&Record> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Every record in the subtree, parents before children.
    pub fn walk(&self) -> Vec<&Record> {
        let mut out = vec![self];
        for c in &self.children {
            out.extend(c.walk());
        }
        out
    }
}
