//! JSON file storage backend for filedoc.
//!
//! One file holds the entire store. Collections read the whole file on every
//! operation and mutating operations rewrite it completely, which keeps the
//! on-disk format trivially inspectable and hand-editable:
//!
//! ```json
//! {
//!   "users": [
//!     {
//!       "name": "Alice",
//!       "_id": "3f9c..."
//!     }
//!   ]
//! }
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use filedoc::{prelude::*, file::JsonFileStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = JsonFileStore::builder().path("db.json").build().await?;
//!     let store = DocumentStore::new(backend);
//!     let users = store.collection("users", SchemaDefinition::new());
//!
//!     println!("{:?}", users.find(None, None).await?);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as filedoc_file;

pub mod store;

pub use store::{DEFAULT_PATH, JsonFileStore, JsonFileStoreBuilder};
