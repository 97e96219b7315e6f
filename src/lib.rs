//! Generate struct definitions from JSON (Hyper-)Schema documents.
//!
//! Pipeline:
//! - [`schema`] loads a document into a typed, navigable graph and
//!   dereferences local `$ref`s.
//! - [`resolve`] walks each top-level property into a [`record::Record`] tree.
//! - [`naming`] turns schema keys into exported identifiers (`user_id` → `UserID`).
//! - [`render`] prints the records as Go structs or JSON.
//!
//! ```
//! use schema2struct::{render, Resolver, SchemaDocument};
//!
//! let doc = SchemaDocument::parse(r#"{
//!     "properties": {
//!         "user": {
//!             "properties": {
//!                 "user_id": { "type": ["integer"] },
//!                 "profile": {
//!                     "type": ["object"],
//!                     "properties": { "avatar_url": { "type": ["string"] } }
//!                 }
//!             }
//!         }
//!     }
//! }"#).unwrap();
//!
//! let records = Resolver::new(&doc).resolve_all().unwrap();
//! assert_eq!(records[0].name, "User");
//! assert!(render::go(&records).contains("AvatarURL string"));
//! ```
pub mod cli;
pub mod error;
pub mod naming;
pub mod record;
pub mod render;
pub mod resolve;
pub mod schema;

pub use error::{LoadError, ReferenceError, ResolveError};
pub use naming::format_identifier;
pub use record::{FieldType, Record};
pub use resolve::{Resolver, ResolverConfig};
pub use schema::{PrimitiveType, Schema, SchemaDocument};
