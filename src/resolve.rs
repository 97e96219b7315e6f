//! Schema → record tree resolution.
//!
//! Walks `definitions` then `properties` of each node (both sorted by key),
//! follows `$ref`s against the owning document and classifies every entry as a
//! primitive field or a nested record.
//!
//! Design goals:
//! - Pure recursion; no state survives a call.
//! - Bounded: record nesting stops at a fixed depth ceiling, and a `$ref`
//!   chain that revisits a reference fails with
//!   [`ResolveError::DepthExceeded`] instead of spinning.
//! - No partial output: any error aborts the top-level property.
use std::collections::BTreeSet;
use std::ops::Deref;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::ResolveError;
use crate::naming::format_identifier;
use crate::record::{FieldType, Record};
use crate::schema::{PrimitiveType, Schema, SchemaDocument};

// ------------------------------- Policy ---------------------------------- //

pub const DEFAULT_MAX_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Deepest record allowed; the top-level record sits at depth 1.
    pub max_depth: usize,
    /// When set, a `$ref` to an object schema becomes a nested record instead
    /// of a `struct` leaf.
    pub expand_refs: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, expand_refs: false }
    }
}

// ------------------------------ Resolver --------------------------------- //

/// What a single schema entry turns into inside its parent record.
enum Slot {
    Field(FieldType),
    Child(Record),
}

/// A node after `$ref` chasing: either the original node or a shared target.
enum Resolved<'s> {
    Inline(&'s Schema),
    Shared(Rc<Schema>),
}

impl Deref for Resolved<'_> {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        match self {
            Self::Inline(node) => node,
            Self::Shared(node) => node,
        }
    }
}

pub struct Resolver<'a> {
    doc: &'a SchemaDocument,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(doc: &'a SchemaDocument) -> Self {
        Self::with_config(doc, ResolverConfig::default())
    }

    pub fn with_config(doc: &'a SchemaDocument, config: ResolverConfig) -> Self {
        Self { doc, config }
    }

    pub fn config(&self) -> ResolverConfig {
        self.config
    }

    /// Resolve every top-level property of the root, sorted by key. Each entry
    /// succeeds or fails on its own.
    pub fn resolve_document(&self) -> Vec<(String, Result<Record, ResolveError>)> {
        self.doc
            .root()
            .properties
            .iter()
            .map(|(key, node)| {
                let name = format_identifier(key);
                (key.clone(), self.resolve_at(node, &name, 0, key))
            })
            .collect()
    }

    /// Like [`Self::resolve_document`], but the first failing property fails
    /// the whole run.
    pub fn resolve_all(&self) -> Result<Vec<Record>, ResolveError> {
        self.resolve_document()
            .into_iter()
            .map(|(_, result)| result)
            .collect()
    }

    /// Build the record for `node`, one level below `depth`.
    pub fn resolve(&self, node: &Schema, name: &str, depth: usize) -> Result<Record, ResolveError> {
        self.resolve_at(node, name, depth, name)
    }

    fn resolve_at(
        &self,
        node: &Schema,
        name: &str,
        depth: usize,
        path: &str,
    ) -> Result<Record, ResolveError> {
        let depth = depth + 1;
        if depth > self.config.max_depth {
            return Err(ResolveError::DepthExceeded {
                limit: self.config.max_depth,
                path: path.to_string(),
            });
        }

        let node = self.follow(node, path)?;
        let mut record = Record::new(name, depth);

        // definitions first, then properties
        for (key, entry) in node.definitions.iter().chain(node.properties.iter()) {
            let entry_path = format!("{path}.{key}");
            let field_name = format_identifier(key);
            let slot = self.classify(entry, &field_name, depth, &entry_path)?;
            place(&mut record, field_name, slot, &entry_path)?;
        }

        debug!(
            record = %record.name,
            depth,
            fields = record.fields.len(),
            children = record.children.len(),
            "resolved record"
        );
        Ok(record)
    }

    fn classify(
        &self,
        entry: &Schema,
        name: &str,
        depth: usize,
        path: &str,
    ) -> Result<Slot, ResolveError> {
        if entry.is_reference() {
            let target = self.follow(entry, path)?;
            if self.config.expand_refs && target.has_type(PrimitiveType::Object) {
                return self.resolve_at(&target, name, depth, path).map(Slot::Child);
            }
            return leaf_type(&target, path).map(Slot::Field);
        }
        if entry.has_type(PrimitiveType::Object) {
            return self.resolve_at(entry, name, depth, path).map(Slot::Child);
        }
        leaf_type(entry, path).map(Slot::Field)
    }

    /// Chase a `$ref` chain to its first non-reference target. Hops do not
    /// add depth; revisiting a reference is a cycle.
    fn follow<'s>(&self, node: &'s Schema, path: &str) -> Result<Resolved<'s>, ResolveError> {
        let mut current = Resolved::Inline(node);
        let mut seen = BTreeSet::new();
        while let Some(reference) = current.reference.clone() {
            if !seen.insert(reference.clone()) {
                return Err(ResolveError::DepthExceeded {
                    limit: self.config.max_depth,
                    path: format!("{path} -> {reference}"),
                });
            }
            trace!(%reference, hops = seen.len(), path, "following $ref");
            let target = self.doc.resolve(&reference).map_err(|source| {
                ResolveError::ReferenceResolutionFailed {
                    reference: reference.clone(),
                    path: path.to_string(),
                    source,
                }
            })?;
            current = Resolved::Shared(target);
        }
        Ok(current)
    }
}

// ------------------------------- Helpers --------------------------------- //

/// First declared type that maps to a target primitive (`null` is skipped).
fn leaf_type(schema: &Schema, path: &str) -> Result<FieldType, ResolveError> {
    schema
        .types
        .iter()
        .find_map(|ty| FieldType::from_primitive(*ty))
        .ok_or_else(|| ResolveError::MalformedTypeList { path: path.to_string() })
}

/// Insert a slot, keeping field names and child names disjoint. A repeat of
/// an identical shape is merged; anything else is a collision.
fn place(record: &mut Record, name: String, slot: Slot, path: &str) -> Result<(), ResolveError> {
    let collision = |name: String| ResolveError::NameCollision { name, path: path.to_string() };
    match slot {
        Slot::Field(ty) => {
            if record.child(&name).is_some() {
                return Err(collision(name));
            }
            match record.fields.get(&name) {
                Some(existing) if *existing == ty => {
                    debug!(field = %name, path, "merged duplicate field");
                }
                Some(_) => return Err(collision(name)),
                None => {
                    record.fields.insert(name, ty);
                }
            }
        }
        Slot::Child(child) => {
            if record.fields.contains_key(&name) {
                return Err(collision(name));
            }
            match record.child(&name) {
                Some(existing) if *existing == child => {
                    debug!(record = %name, path, "merged duplicate record");
                }
                Some(_) => return Err(collision(name)),
                None => record.children.push(child),
            }
        }
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //
