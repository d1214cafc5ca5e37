//! Schema-bound collections and their CRUD surface.
//!
//! A [`Collection`] is a named, ordered sequence of documents inside the
//! backend's [`Snapshot`](crate::document::Snapshot). Every operation follows the
//! same pattern:
//!
//! 1. load the full snapshot from the backend
//! 2. read the named collection (an absent collection is empty)
//! 3. compute the result in memory
//! 4. for mutating operations, write the full snapshot back
//!
//! Failures are wrapped in [`DocumentStoreError::Operation`] with a message naming
//! the operation and the queried key, and nothing is persisted.
//!
//! # Example
//!
//! ```ignore
//! use filedoc::prelude::*;
//! use serde_json::json;
//!
//! let users = store.collection(
//!     "users",
//!     SchemaDefinition::new().field("name", FieldKind::String),
//! );
//!
//! let alice = users.create(to_document(&json!({"name": "Alice"}))?, None).await?;
//! let found = users.find_one(Query::eq("name", "Alice"), None).await?;
//! ```

use chrono::Utc;
use serde_json::Value;

use crate::{
    backend::StoreBackend,
    document::{Document, ID_FIELD, generate_id},
    error::{DocumentStoreError, DocumentStoreResult},
    options::{ExtraOptions, OptionEffect, Phase, apply_options},
    query::{Query, UpdatePatch, display_value},
    schema::SchemaDefinition,
};

/// A named collection bound to a schema and a storage backend.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the backend reference
/// * `B` - The storage backend type
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend> {
    name: String,
    schema: SchemaDefinition,
    backend: &'a B,
}

impl<'a, B: StoreBackend> Collection<'a, B> {
    /// Binds a collection name and schema to a backend.
    pub fn new(backend: &'a B, name: impl Into<String>, schema: SchemaDefinition) -> Self {
        Self {
            name: name.into(),
            schema,
            backend,
        }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the schema documents are validated against on create.
    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    /// Checks a document against the collection schema.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::MissingField`] or
    /// [`DocumentStoreError::TypeMismatch`] for the first offending field.
    pub fn validate_document(&self, document: &Document) -> DocumentStoreResult<()> {
        self.schema.validate(document)
    }

    /// Validates and stores a new document under a freshly generated `_id`.
    ///
    /// Any `_id` already present in `document` is replaced. With `timestamps`
    /// engaged, `createdAt` and `updatedAt` are stamped.
    ///
    /// # Returns
    ///
    /// The document as stored, including `_id`.
    pub async fn create(
        &self,
        document: Document,
        options: Option<ExtraOptions>,
    ) -> DocumentStoreResult<Document> {
        self.create_entry(document, options.unwrap_or_default())
            .await
            .map_err(|err| err.context("Failed to create entry"))
    }

    /// Returns the whole collection, or the documents matching `query`.
    ///
    /// With `upsert` engaged, every match whose `_id` is not stored in the
    /// collection is passed to [`Collection::create`].
    pub async fn find(
        &self,
        query: Option<Query>,
        options: Option<ExtraOptions>,
    ) -> DocumentStoreResult<Vec<Document>> {
        let context = match &query {
            Some(query) => format!("Failed to find value: {query}"),
            None => "Failed to find value".to_string(),
        };

        self.find_entries(query, options.unwrap_or_default())
            .await
            .map_err(|err| err.context(context))
    }

    /// Returns the first document matching `query`, if any.
    pub async fn find_one(
        &self,
        query: Query,
        options: Option<ExtraOptions>,
    ) -> DocumentStoreResult<Option<Document>> {
        let context = format!("Failed to find value: {query}");

        self.find_first(query, options.unwrap_or_default())
            .await
            .map_err(|err| err.context(context))
    }

    /// Returns the document with the given `_id`, if any.
    pub async fn find_by_id(
        &self,
        id: &str,
        options: Option<ExtraOptions>,
    ) -> DocumentStoreResult<Option<Document>> {
        self.find_first(Query::id(id), options.unwrap_or_default())
            .await
            .map_err(|err| err.context(format!("Failed to find by id: {id}")))
    }

    /// Returns the number of documents matching `query`, or the collection size.
    pub async fn count(&self, query: Option<Query>) -> DocumentStoreResult<usize> {
        let snapshot = self
            .backend
            .get_data()
            .await
            .map_err(|err| err.context("Failed to count values"))?;
        let documents = snapshot.collection(&self.name);

        Ok(match &query {
            Some(query) => documents
                .iter()
                .filter(|document| query.matches(document))
                .count(),
            None => documents.len(),
        })
    }

    /// Removes every document matching `query`.
    pub async fn delete_many(&self, query: Query) -> DocumentStoreResult<()> {
        let context = format!("Failed to delete values: {query}");

        self.delete_matching(&query)
            .await
            .map_err(|err| err.context(context))
    }

    /// Removes the first document matching `query`.
    ///
    /// Nothing is written when no document matches; that is not an error.
    pub async fn delete_one(&self, query: Query) -> DocumentStoreResult<()> {
        let context = format!("Failed to delete value: {query}");

        self.delete_first(&query)
            .await
            .map(|_| ())
            .map_err(|err| err.context(context))
    }

    /// Merges `patch` onto every document matching `query`.
    ///
    /// With `timestamps` engaged, `updatedAt` is refreshed on every document of
    /// the collection, matched or not.
    ///
    /// # Returns
    ///
    /// The full collection after the update.
    pub async fn update_many(
        &self,
        query: Query,
        patch: UpdatePatch,
        options: Option<ExtraOptions>,
    ) -> DocumentStoreResult<Vec<Document>> {
        let context = format!("Failed to update values: {query}");

        self.update_matching(&query, &patch, options.unwrap_or_default())
            .await
            .map_err(|err| err.context(context))
    }

    /// Merges `patch` onto the document with the given `_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::NotFound`] (wrapped) if no document has that id.
    pub async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: UpdatePatch,
        options: Option<ExtraOptions>,
    ) -> DocumentStoreResult<Document> {
        self.update_first(&Query::id(id), &patch, options.unwrap_or_default())
            .await
            .map_err(|err| err.context(format!("Failed to update by id: {id}")))
    }

    /// Merges `patch` onto the first document matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::NotFound`] (wrapped) if nothing matches.
    pub async fn find_one_and_update(
        &self,
        query: Query,
        patch: UpdatePatch,
        options: Option<ExtraOptions>,
    ) -> DocumentStoreResult<Document> {
        let context = format!("Failed to update value: {query}");

        self.update_first(&query, &patch, options.unwrap_or_default())
            .await
            .map_err(|err| err.context(context))
    }

    /// Removes and returns the document with the given `_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::NotFound`] (wrapped) if no document has that id.
    pub async fn find_by_id_and_delete(&self, id: &str) -> DocumentStoreResult<Document> {
        self.remove_existing(&Query::id(id))
            .await
            .map_err(|err| err.context(format!("Failed to delete by id: {id}")))
    }

    /// Finds the first document matching `query`, then deletes by that
    /// document's first field.
    ///
    /// The delete predicate is built from the found document, not from `query`,
    /// so when the first field is shared by an earlier document, that earlier
    /// document is the one removed.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::NotFound`] (wrapped) if nothing matches.
    pub async fn find_one_and_delete(&self, query: Query) -> DocumentStoreResult<Document> {
        let context = format!("Failed to find and delete value: {query}");

        self.find_then_delete(query)
            .await
            .map_err(|err| err.context(context))
    }

    async fn create_entry(
        &self,
        mut document: Document,
        options: ExtraOptions,
    ) -> DocumentStoreResult<Document> {
        self.validate_document(&document)?;

        document.insert(ID_FIELD.to_string(), Value::String(generate_id()));

        let mut snapshot = self.backend.get_data().await?;
        let documents = snapshot.collection_mut(&self.name);
        let document = apply_options(Phase::Create, &options, document, documents, Utc::now()).document;

        documents.push(document.clone());
        self.backend.set_data(snapshot).await?;

        log::debug!("Created document in collection {}", self.name);

        Ok(document)
    }

    async fn find_entries(
        &self,
        query: Option<Query>,
        options: ExtraOptions,
    ) -> DocumentStoreResult<Vec<Document>> {
        let snapshot = self.backend.get_data().await?;
        let documents = snapshot.collection(&self.name);

        let Some(query) = query else {
            return Ok(documents.to_vec());
        };

        let now = Utc::now();
        let mut found = Vec::new();
        let mut inserts = Vec::new();

        for document in documents.iter().filter(|document| query.matches(document)) {
            let applied = apply_options(Phase::Find, &options, document.clone(), documents, now);

            if let Some(OptionEffect::Insert(pending)) = applied.effect {
                inserts.push(pending);
            }

            found.push(applied.document);
        }

        for pending in inserts {
            log::debug!("Upserting unstored document into collection {}", self.name);
            self.create(pending, None).await?;
        }

        Ok(found)
    }

    async fn find_first(
        &self,
        query: Query,
        options: ExtraOptions,
    ) -> DocumentStoreResult<Option<Document>> {
        let snapshot = self.backend.get_data().await?;
        let documents = snapshot.collection(&self.name);

        let Some(document) = documents.iter().find(|document| query.matches(document)) else {
            return Ok(None);
        };

        let applied = apply_options(Phase::Find, &options, document.clone(), documents, Utc::now());

        if let Some(OptionEffect::Insert(pending)) = applied.effect {
            log::debug!("Upserting unstored document into collection {}", self.name);
            self.create(pending, None).await?;
        }

        Ok(Some(applied.document))
    }

    async fn delete_matching(&self, query: &Query) -> DocumentStoreResult<()> {
        let mut snapshot = self.backend.get_data().await?;
        let documents = snapshot.collection_mut(&self.name);
        let before = documents.len();

        documents.retain(|document| !query.matches(document));
        let removed = before - documents.len();

        self.backend.set_data(snapshot).await?;

        log::debug!("Deleted {removed} document(s) from collection {}", self.name);

        Ok(())
    }

    async fn delete_first(&self, query: &Query) -> DocumentStoreResult<Option<Document>> {
        let mut snapshot = self.backend.get_data().await?;
        let documents = snapshot.collection_mut(&self.name);

        let Some(index) = documents.iter().position(|document| query.matches(document)) else {
            log::trace!("No document matched {query} in collection {}", self.name);
            return Ok(None);
        };

        let removed = documents.remove(index);
        self.backend.set_data(snapshot).await?;

        log::debug!("Deleted document from collection {}", self.name);

        Ok(Some(removed))
    }

    async fn remove_existing(&self, query: &Query) -> DocumentStoreResult<Document> {
        self.delete_first(query)
            .await?
            .ok_or_else(|| self.not_found(query))
    }

    async fn find_then_delete(&self, query: Query) -> DocumentStoreResult<Document> {
        let found = self
            .find_one(query.clone(), None)
            .await?
            .ok_or_else(|| self.not_found(&query))?;

        if let Some(delete_query) = Query::from_first_entry(&found) {
            self.delete_one(delete_query).await?;
        }

        Ok(found)
    }

    async fn update_matching(
        &self,
        query: &Query,
        patch: &UpdatePatch,
        options: ExtraOptions,
    ) -> DocumentStoreResult<Vec<Document>> {
        let mut snapshot = self.backend.get_data().await?;
        let now = Utc::now();

        let merged = snapshot
            .collection(&self.name)
            .iter()
            .cloned()
            .map(|mut document| {
                if query.matches(&document) {
                    patch.apply_to(&mut document);
                }
                document
            })
            .collect::<Vec<_>>();

        // Update-phase options reach every document, matched or not.
        let updated = merged
            .iter()
            .cloned()
            .map(|document| apply_options(Phase::Update, &options, document, &merged, now).document)
            .collect::<Vec<_>>();

        snapshot.set_collection(&self.name, updated.clone());
        self.backend.set_data(snapshot).await?;

        log::debug!("Updated documents matching {query} in collection {}", self.name);

        Ok(updated)
    }

    async fn update_first(
        &self,
        query: &Query,
        patch: &UpdatePatch,
        options: ExtraOptions,
    ) -> DocumentStoreResult<Document> {
        let mut snapshot = self.backend.get_data().await?;
        let documents = snapshot.collection_mut(&self.name);

        let index = documents
            .iter()
            .position(|document| query.matches(document))
            .ok_or_else(|| self.not_found(query))?;

        let mut document = documents[index].clone();
        patch.apply_to(&mut document);

        let document = apply_options(Phase::Update, &options, document, documents, Utc::now()).document;
        documents[index] = document.clone();

        self.backend.set_data(snapshot).await?;

        log::debug!("Updated document matching {query} in collection {}", self.name);

        Ok(document)
    }

    fn not_found(&self, query: &Query) -> DocumentStoreError {
        DocumentStoreError::NotFound {
            collection: self.name.clone(),
            field: query.field.clone(),
            value: display_value(&query.value),
        }
    }
}
