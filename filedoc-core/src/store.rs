//! Main document store interface.
//!
//! [`DocumentStore`] owns a backend and hands out schema-bound
//! [`Collection`]s. [`DynDocumentStore`] is the same store over a boxed
//! backend chosen at runtime.
//!
//! # Example
//!
//! ```ignore
//! use filedoc::{prelude::*, file::JsonFileStore};
//!
//! let store = DocumentStore::new(
//!     JsonFileStore::builder().path("db.json").build().await?,
//! );
//! let users = store.collection("users", SchemaDefinition::new());
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::Collection,
    error::{DocumentStoreError, DocumentStoreResult},
    schema::SchemaDefinition,
};

/// A document store bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

/// A document store over a backend selected at runtime.
pub type DynDocumentStore = DocumentStore<Box<dyn DynStoreBackend>>;

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gets a collection with the given name, validated against `schema` on create.
    pub fn collection(&self, name: &str, schema: SchemaDefinition) -> Collection<'_, B> {
        Collection::new(&self.backend, name, schema)
    }

    /// Lists the collections present in the stored snapshot, in stored order.
    pub async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(self
            .backend
            .get_data()
            .await?
            .collection_names())
    }

    /// Drops (deletes) a collection and all of its documents.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::CollectionNotFound`] if the snapshot has no
    /// such collection key.
    pub async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        let mut snapshot = self.backend.get_data().await?;

        if snapshot.remove_collection(name).is_none() {
            return Err(DocumentStoreError::CollectionNotFound(name.to_string()));
        }

        self.backend.set_data(snapshot).await?;

        log::debug!("Dropped collection {name}");

        Ok(())
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }
}

impl<B: StoreBackend + 'static> DocumentStore<B> {
    /// Converts this store into one over a boxed backend.
    pub fn into_dyn(self) -> DynDocumentStore {
        DocumentStore::new(Box::new(self.backend) as Box<dyn DynStoreBackend>)
    }
}
