//! Main filedoc crate providing an embedded, single-file JSON document store.
//!
//! This crate is the primary entry point for users of filedoc. It re-exports
//! the core types from `filedoc-core` and gives access to the storage backends.
//!
//! # Features
//!
//! - **One file, whole database** - Every collection lives in a single JSON file
//! - **Schema-checked creates** - Required fields and their primitive kinds are enforced on insert
//! - **Familiar operations** - `find`, `find_one`, `update_many`, `find_one_and_delete`, ...
//! - **Extra options** - Opt into `timestamps` and `upsert` per call
//! - **Swappable storage** - The file backend and the in-memory backend share one trait
//!
//! # Quick Start
//!
//! ```ignore
//! use filedoc::{prelude::*, file::JsonFileStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     let store = DocumentStore::new(
//!         JsonFileStore::builder().path("db.json").build().await?,
//!     );
//!
//!     let users = store.collection(
//!         "users",
//!         SchemaDefinition::new()
//!             .field("name", FieldKind::String)
//!             .field("age", FieldKind::Number),
//!     );
//!
//!     // Create with timestamps
//!     let alice = users
//!         .create(
//!             to_document(&json!({"name": "Alice", "age": 30}))?,
//!             Some(ExtraOptions::new().timestamps(true)),
//!         )
//!         .await?;
//!
//!     // Update through a `$set` patch
//!     let patch = UpdatePatch::try_from(json!({"$set": {"age": 31}}))?;
//!     users
//!         .find_one_and_update(Query::eq("name", "Alice"), patch, None)
//!         .await?;
//!
//!     // Remove by id
//!     users.find_by_id_and_delete(alice.id().unwrap()).await?;
//!
//!     store.shutdown().await
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! A store can be converted into one over a boxed backend with `into_dyn`,
//! which lets the backend be chosen at runtime:
//!
//! ```ignore
//! use filedoc::{prelude::*, memory::InMemoryStore, file::JsonFileStore};
//!
//! let store: DynDocumentStore = if ephemeral {
//!     DocumentStore::new(InMemoryStore::new()).into_dyn()
//! } else {
//!     DocumentStore::new(JsonFileStore::new("db.json")).into_dyn()
//! };
//! ```
//!
//! # Concurrency
//!
//! Operations are read-modify-write cycles over the whole file without any
//! locking. Concurrent writers to the same file race and the last write wins.
//!
//! # Backends
//!
//! - [`file`] - The JSON file backend
//! - [`memory`] - In-memory storage for tests and ephemeral data

pub mod prelude;

pub use filedoc_core::{backend, collection, document, error, options, query, schema, store};

// Re-exported for convenience
pub use async_trait::async_trait;
pub use serde_json;

/// JSON file storage backend.
pub mod file {
    pub use filedoc_file::{DEFAULT_PATH, JsonFileStore, JsonFileStoreBuilder};
}

/// In-memory storage backend.
pub mod memory {
    pub use filedoc_memory::{InMemoryStore, InMemoryStoreBuilder};
}
