//! In-memory snapshot backend for filedoc.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `StoreBackend` trait. It behaves exactly like the file backend from the
//! point of view of a collection, which makes it the natural choice for
//! tests and throwaway stores.
//!
//! # Quick Start
//!
//! ```ignore
//! use filedoc::{prelude::*, memory::InMemoryStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!     let users = store.collection("users", SchemaDefinition::new());
//!
//!     users.create(to_document(&json!({"name": "Alice"}))?, None).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as filedoc_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
