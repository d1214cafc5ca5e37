#![allow(dead_code)]

use filedoc::{file::JsonFileStore, prelude::*};
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builds a document from a `json!` object literal.
pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn docs(values: Value) -> Vec<Document> {
    match values {
        Value::Array(items) => items.into_iter().map(doc).collect(),
        other => panic!("expected a JSON array, got {other}"),
    }
}

pub fn person_schema() -> SchemaDefinition {
    SchemaDefinition::new()
        .field("name", FieldKind::String)
        .field("age", FieldKind::Number)
}

/// A file-backed store living in its own temporary directory.
pub struct FileFixture {
    pub dir: TempDir,
    pub path: PathBuf,
    pub store: DocumentStore<JsonFileStore>,
}

impl FileFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("db.json");
        let store = DocumentStore::new(JsonFileStore::new(&path));

        Self { dir, path, store }
    }

    /// Writes `documents` as the content of collection `name`.
    pub async fn seed(&self, name: &str, documents: Vec<Document>) {
        let mut snapshot = StoreBackend::get_data(self.store.backend())
            .await
            .expect("load snapshot");
        snapshot.set_collection(name, documents);
        StoreBackend::set_data(self.store.backend(), snapshot)
            .await
            .expect("save snapshot");
    }

    pub fn read_file(&self) -> Value {
        let content = std::fs::read_to_string(&self.path).expect("read db file");
        serde_json::from_str(&content).expect("parse db file")
    }
}
