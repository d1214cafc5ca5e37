//! Convenient re-exports of commonly used types from filedoc.
//!
//! ```ignore
//! use filedoc::prelude::*;
//! ```
//!
//! This provides access to:
//! - Documents, snapshots and conversion helpers
//! - Store backends and builders
//! - Queries, update patches and extra options
//! - Collections, schemas and error types
//!
//! [`DynStoreBackend`](crate::backend::DynStoreBackend) is left out: its
//! methods share names with [`StoreBackend`] and would make backend calls
//! ambiguous. [`DynDocumentStore`] covers the boxed case.

pub use filedoc_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::Collection,
    document::{Document, DocumentExt, Snapshot, from_document, to_document},
    error::{DocumentStoreError, DocumentStoreResult},
    options::{ExtraOptions, Phase},
    query::{Query, UpdatePatch},
    schema::{FieldKind, SchemaDefinition},
    store::{DocumentStore, DynDocumentStore},
};
