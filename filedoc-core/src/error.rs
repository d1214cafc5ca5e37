//! Error types and result types for document store operations.
//!
//! Every fallible operation in this crate returns [`DocumentStoreResult<T>`].
//! Collection operations wrap the underlying failure in
//! [`DocumentStoreError::Operation`] so the caller sees which call and which key
//! failed while the original cause stays reachable through
//! [`std::error::Error::source`] or [`DocumentStoreError::root`].

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

use crate::schema::FieldKind;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// The backing file could not be read or written for a reason other than absence.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The stored content is not a valid snapshot.
    #[error("Failed to parse stored JSON: {0}")]
    Parse(#[source] SerdeJsonError),
    /// Converting a value to or from a document failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A field declared by the collection schema is absent from the document.
    #[error("Missing required field: {0}")]
    MissingField(String),
    /// A field declared by the collection schema holds a value of another kind.
    #[error("Invalid type for field {field}: expected {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        found: &'static str,
    },
    /// An extra option key is not one of `upsert`, `new` or `timestamps`.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    /// An option phase tag is not one of `create`, `update`, `delete` or `find`.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// A query could not be built from the given value.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// An update patch could not be built from the given value.
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
    /// No document in the collection matched the lookup.
    #[error("No entry found for key: {field}, value: {value} in collection {collection}")]
    NotFound {
        collection: String,
        field: String,
        value: String,
    },
    /// The requested collection does not exist in the store.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    /// A failure raised while running a named collection operation.
    #[error("{context}: {source}")]
    Operation {
        context: String,
        #[source]
        source: Box<DocumentStoreError>,
    },
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl DocumentStoreError {
    /// Wraps this error with an operation-specific message.
    pub fn context(self, context: impl Into<String>) -> Self {
        DocumentStoreError::Operation {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping every [`DocumentStoreError::Operation`] layer.
    pub fn root(&self) -> &DocumentStoreError {
        let mut current = self;

        while let DocumentStoreError::Operation { source, .. } = current {
            current = source;
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_the_cause_reachable() {
        let err = DocumentStoreError::MissingField("age".into())
            .context("Failed to create entry")
            .context("outer");

        assert!(matches!(err.root(), DocumentStoreError::MissingField(f) if f == "age"));
        assert_eq!(
            err.to_string(),
            "outer: Failed to create entry: Missing required field: age"
        );
    }

    #[test]
    fn root_of_plain_error_is_itself() {
        let err = DocumentStoreError::InvalidOption("bogus".into());

        assert!(matches!(err.root(), DocumentStoreError::InvalidOption(_)));
    }
}
