//! Core types for document representation and persistence.
//!
//! A [`Document`] is an ordered JSON object. A [`Snapshot`] is the whole content
//! of a store: every collection name mapped to its ordered sequence of documents.
//! Backends load and save snapshots as a unit.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Name of the generated identifier field carried by every created document.
pub const ID_FIELD: &str = "_id";
/// Field stamped with the creation time when timestamps are engaged.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Field stamped with the last modification time when timestamps are engaged.
pub const UPDATED_AT_FIELD: &str = "updatedAt";
/// Number of random bytes behind a generated identifier.
pub const ID_BYTES: usize = 30;

/// A single record: an open, ordered mapping of field names to JSON values.
pub type Document = Map<String, Value>;

/// Convenience accessors for [`Document`] values.
pub trait DocumentExt {
    /// Returns the `_id` field when it holds a string.
    fn id(&self) -> Option<&str>;

    /// Returns the first field of the document in insertion order.
    fn first_entry(&self) -> Option<(&String, &Value)>;

    /// Shallow-merges `patch` onto this document. Existing keys keep their
    /// position, new keys are appended.
    fn merge(&mut self, patch: &Document);
}

impl DocumentExt for Document {
    fn id(&self) -> Option<&str> {
        self.get(ID_FIELD).and_then(Value::as_str)
    }

    fn first_entry(&self) -> Option<(&String, &Value)> {
        self.iter().next()
    }

    fn merge(&mut self, patch: &Document) {
        for (key, value) in patch {
            self.insert(key.clone(), value.clone());
        }
    }
}

/// The entire store content at a point in time.
///
/// Collection order and document order are preserved across a save/load
/// round-trip. Reading an absent collection yields an empty slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    collections: IndexMap<String, Vec<Document>>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the documents of a collection, or an empty slice if it is absent.
    pub fn collection(&self, name: &str) -> &[Document] {
        self.collections
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns a mutable handle to a collection, creating it empty if absent.
    pub fn collection_mut(&mut self, name: &str) -> &mut Vec<Document> {
        self.collections
            .entry(name.to_string())
            .or_default()
    }

    /// Replaces the documents of a collection.
    pub fn set_collection(&mut self, name: &str, documents: Vec<Document>) {
        self.collections.insert(name.to_string(), documents);
    }

    /// Removes a collection, returning its documents if it existed.
    pub fn remove_collection(&mut self, name: &str) -> Option<Vec<Document>> {
        self.collections.shift_remove(name)
    }

    /// Returns `true` if the snapshot holds the named collection key.
    pub fn contains_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Lists collection names in stored order.
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    /// Returns the number of collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Returns `true` if the snapshot holds no collections.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

impl FromIterator<(String, Vec<Document>)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Document>)>>(iter: I) -> Self {
        Self {
            collections: iter.into_iter().collect(),
        }
    }
}

/// Generates a document identifier: lowercase hex of [`ID_BYTES`] bytes from the OS RNG.
///
/// Uniqueness is probabilistic and never checked against stored documents.
pub fn generate_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    OsRng.fill_bytes(&mut bytes);

    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Formats a point in time the way stored timestamps are written, e.g.
/// `2024-01-01T00:00:00.000Z`.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns the JSON kind name of a value as reported in validation errors.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts any serializable value into a document.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Serialization`] if the value does not
/// serialize to a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> DocumentStoreResult<Document> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DocumentStoreError::Serialization(format!(
            "expected an object, got {}",
            kind_name(&other)
        ))),
        Err(err) => Err(DocumentStoreError::Serialization(err.to_string())),
    }
}

/// Converts a document into any deserializable type.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Serialization`] if the document does not fit `T`.
pub fn from_document<T: DeserializeOwned>(document: Document) -> DocumentStoreResult<T> {
    serde_json::from_value(Value::Object(document))
        .map_err(|err| DocumentStoreError::Serialization(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn generated_ids_are_lowercase_hex() {
        let id = generate_id();

        assert_eq!(id.len(), ID_BYTES * 2);
        assert!(id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert_ne!(id, generate_id());
    }

    #[test]
    fn timestamps_use_millisecond_utc_format() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(format_timestamp(time), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn merge_overwrites_in_place_and_appends_new_keys() {
        let mut target = doc(json!({"k": "a", "v": 1, "_id": "x"}));
        target.merge(&doc(json!({"v": 99, "extra": true})));

        assert_eq!(
            Value::Object(target),
            json!({"k": "a", "v": 99, "_id": "x", "extra": true})
        );
    }

    #[test]
    fn first_entry_follows_insertion_order() {
        let document = doc(json!({"name": "a", "_id": "x"}));

        assert_eq!(document.first_entry(), Some((&"name".to_string(), &json!("a"))));
        assert_eq!(document.id(), Some("x"));
    }

    #[test]
    fn missing_collection_reads_as_empty() {
        let mut snapshot = Snapshot::new();

        assert!(snapshot.collection("users").is_empty());
        assert!(!snapshot.contains_collection("users"));

        snapshot.collection_mut("users").push(doc(json!({"k": 1})));
        assert_eq!(snapshot.collection("users").len(), 1);
        assert_eq!(snapshot.collection_names(), vec!["users".to_string()]);
    }

    #[test]
    fn snapshot_serializes_as_plain_object() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "b": [{"k": 1}],
            "a": []
        }))
        .unwrap();

        assert_eq!(snapshot.collection_names(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({"b": [{"k": 1}], "a": []})
        );
    }

    #[test]
    fn snapshot_rejects_non_array_collections() {
        let result = serde_json::from_value::<Snapshot>(json!({"users": {"k": 1}}));

        assert!(result.is_err());
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    #[test]
    fn typed_conversion_through_documents() {
        let user = User { name: "Alice".into(), age: 30 };
        let document = to_document(&user).unwrap();

        assert_eq!(Value::Object(document.clone()), json!({"name": "Alice", "age": 30}));
        assert_eq!(from_document::<User>(document).unwrap(), user);
        assert!(matches!(
            to_document(&5),
            Err(DocumentStoreError::Serialization(_))
        ));
    }
}
