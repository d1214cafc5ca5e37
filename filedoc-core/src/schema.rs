//! Collection schemas and document validation.
//!
//! A [`SchemaDefinition`] lists required fields and the primitive kind each must
//! hold. It is additive: fields it does not declare pass through unchecked.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::{
    document::{Document, kind_name},
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Primitive kind a schema field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
}

impl FieldKind {
    /// Returns `true` if `value` is of this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "String"),
            FieldKind::Number => write!(f, "Number"),
            FieldKind::Boolean => write!(f, "Boolean"),
        }
    }
}

/// Required fields of a collection and their expected kinds, in declaration order.
///
/// # Example
///
/// ```ignore
/// use filedoc::schema::{FieldKind, SchemaDefinition};
///
/// let schema = SchemaDefinition::new()
///     .field("name", FieldKind::String)
///     .field("age", FieldKind::Number);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDefinition {
    fields: IndexMap<String, FieldKind>,
}

impl SchemaDefinition {
    /// Creates a schema with no required fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a required field.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// Returns the expected kind of a declared field.
    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    /// Iterates declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields
            .iter()
            .map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Checks a document against every declared field, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::MissingField`] for the first absent field or
    /// [`DocumentStoreError::TypeMismatch`] for the first field of the wrong kind.
    /// A `null` value counts as a mismatch, not as a missing field.
    pub fn validate(&self, document: &Document) -> DocumentStoreResult<()> {
        for (name, kind) in self.fields() {
            let value = document
                .get(name)
                .ok_or_else(|| DocumentStoreError::MissingField(name.to_string()))?;

            if !kind.accepts(value) {
                return Err(DocumentStoreError::TypeMismatch {
                    field: name.to_string(),
                    expected: kind,
                    found: kind_name(value),
                });
            }
        }

        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, FieldKind)> for SchemaDefinition {
    fn from_iter<I: IntoIterator<Item = (K, FieldKind)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, kind)| (name.into(), kind))
                .collect(),
        }
    }
}
