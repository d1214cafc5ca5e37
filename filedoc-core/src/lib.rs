//! An embedded, single-file JSON document store.
//!
//! This crate is the core of the filedoc project and provides:
//!
//! - **Documents and snapshots** ([`document`]) - The stored data model and identifier generation
//! - **Schemas** ([`schema`]) - Required-field declarations checked when documents are created
//! - **Queries and patches** ([`query`]) - Single-field equality predicates and `$set` updates
//! - **Extra options** ([`options`]) - `upsert`, `new` and `timestamps` side effects
//! - **Store backend abstraction** ([`backend`]) - Whole-snapshot load and save
//! - **Collections** ([`collection`]) - The CRUD surface over one named collection
//! - **Document store** ([`store`]) - Entry point owning a backend
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use filedoc::{prelude::*, memory::InMemoryStore};
//! use serde_json::json;
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let users = store.collection(
//!     "users",
//!     SchemaDefinition::new()
//!         .field("name", FieldKind::String)
//!         .field("age", FieldKind::Number),
//! );
//!
//! let user = users
//!     .create(to_document(&json!({"name": "Alice", "age": 30}))?, None)
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as filedoc_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod options;
pub mod query;
pub mod schema;
pub mod store;
