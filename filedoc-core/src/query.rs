//! Single-predicate queries and `$set` update patches.
//!
//! A [`Query`] is one `{field, value}` equality predicate. Matching follows
//! strict equality on primitives:
//!
//! - strings and booleans compare by value
//! - numbers compare numerically, so `1` matches `1.0`
//! - `null` matches `null`
//! - arrays and objects never match, not even an identical literal
//! - a document lacking the field never matches
//!
//! ```ignore
//! use filedoc::query::{Query, UpdatePatch};
//! use serde_json::json;
//!
//! let query = Query::eq("status", "active");
//! let patch = UpdatePatch::try_from(json!({"$set": {"status": "archived"}}))?;
//! ```

use serde_json::Value;
use std::fmt;

use crate::{
    document::{Document, DocumentExt, ID_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Key recognized by [`UpdatePatch`].
pub const SET_OPERATOR: &str = "$set";

/// An equality predicate on a single document field.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The field to compare.
    pub field: String,
    /// The value the field must equal.
    pub value: Value,
}

impl Query {
    /// Creates an equality predicate.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a predicate on the generated `_id` field.
    pub fn id(id: impl Into<String>) -> Self {
        Self::eq(ID_FIELD, Value::String(id.into()))
    }

    /// Builds a predicate from the first field of a document.
    ///
    /// Returns `None` for an empty document.
    pub fn from_first_entry(document: &Document) -> Option<Self> {
        document
            .first_entry()
            .map(|(field, value)| Self::eq(field.clone(), value.clone()))
    }

    /// Returns `true` if the document satisfies this predicate.
    pub fn matches(&self, document: &Document) -> bool {
        document
            .get(&self.field)
            .is_some_and(|value| strict_equals(value, &self.value))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.field, display_value(&self.value))
    }
}

impl TryFrom<Value> for Query {
    type Error = DocumentStoreError;

    /// Parses a JSON object holding exactly one entry.
    fn try_from(value: Value) -> DocumentStoreResult<Self> {
        let Value::Object(map) = value else {
            return Err(DocumentStoreError::InvalidQuery(
                "query must be a JSON object".into(),
            ));
        };

        if map.len() != 1 {
            return Err(DocumentStoreError::InvalidQuery(format!(
                "query must hold exactly one field, got {}",
                map.len()
            )));
        }

        Query::from_first_entry(&map)
            .ok_or_else(|| DocumentStoreError::InvalidQuery("query is empty".into()))
    }
}

/// Renders a value for error and log messages: strings without quotes,
/// everything else as compact JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => false,
    }
}

/// A partial document merged shallowly onto matched documents.
///
/// Patches are not checked against the collection schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePatch {
    set: Document,
}

impl UpdatePatch {
    /// Creates a patch that sets the given fields.
    pub fn set(fields: Document) -> Self {
        Self { set: fields }
    }

    /// Adds one field to the patch.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    /// Returns the fields this patch sets.
    pub fn fields(&self) -> &Document {
        &self.set
    }

    /// Applies the patch to a document.
    pub fn apply_to(&self, document: &mut Document) {
        document.merge(&self.set);
    }
}

impl TryFrom<Value> for UpdatePatch {
    type Error = DocumentStoreError;

    /// Parses `{"$set": {...}}`. Any other top-level key is rejected.
    fn try_from(value: Value) -> DocumentStoreResult<Self> {
        let Value::Object(mut map) = value else {
            return Err(DocumentStoreError::InvalidUpdate(
                "update must be a JSON object".into(),
            ));
        };

        if let Some(key) = map.keys().find(|key| key.as_str() != SET_OPERATOR) {
            return Err(DocumentStoreError::InvalidUpdate(format!(
                "unsupported update operator: {key}"
            )));
        }

        match map.remove(SET_OPERATOR) {
            Some(Value::Object(fields)) => Ok(Self::set(fields)),
            Some(_) => Err(DocumentStoreError::InvalidUpdate(format!(
                "{SET_OPERATOR} must hold a JSON object"
            ))),
            None => Err(DocumentStoreError::InvalidUpdate(format!(
                "update must hold {SET_OPERATOR}"
            ))),
        }
    }
}
