mod common;

use common::{FileFixture, doc, docs, person_schema};
use filedoc::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn timestamp(document: &Document, field: &str) -> String {
    match document.get(field) {
        Some(Value::String(value)) => value.clone(),
        other => panic!("expected {field} to be a string, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_with_timestamps() {
    let fixture = FileFixture::new();
    let people = fixture.store.collection("people", person_schema());

    let created = people
        .create(
            doc(json!({"name": "Alice", "age": 30})),
            Some(ExtraOptions::new().timestamps(true)),
        )
        .await
        .unwrap();

    let created_at = timestamp(&created, "createdAt");
    let updated_at = timestamp(&created, "updatedAt");

    assert_eq!(created_at, updated_at);
    assert_eq!(created_at.len(), 24);
    assert!(created_at.ends_with('Z'));
    assert_eq!(people.find(None, None).await.unwrap(), vec![created]);
}

#[tokio::test]
async fn test_create_without_options_adds_no_timestamps() {
    let fixture = FileFixture::new();
    let people = fixture.store.collection("people", person_schema());

    let created = people
        .create(doc(json!({"name": "Alice", "age": 30})), None)
        .await
        .unwrap();

    assert!(!created.contains_key("createdAt"));
    assert!(!created.contains_key("updatedAt"));
}

#[test]
fn test_unknown_option_is_rejected() {
    let err = ExtraOptions::try_from(json!({"bogus": true})).unwrap_err();

    assert!(matches!(err, DocumentStoreError::InvalidOption(name) if name.contains("bogus")));
}

#[tokio::test]
async fn test_find_one_and_update_refreshes_updated_at_only() {
    let fixture = FileFixture::new();
    fixture
        .seed(
            "items",
            docs(json!([{
                "k": "a",
                "v": 1,
                "createdAt": "2020-01-01T00:00:00.000Z",
                "updatedAt": "2020-01-01T00:00:00.000Z"
            }])),
        )
        .await;
    let items = fixture.store.collection("items", SchemaDefinition::new());

    let updated = items
        .find_one_and_update(
            Query::eq("k", "a"),
            UpdatePatch::default().with("v", 2),
            Some(ExtraOptions::new().timestamps(true)),
        )
        .await
        .unwrap();

    assert_eq!(updated["v"], json!(2));
    assert_eq!(updated["createdAt"], json!("2020-01-01T00:00:00.000Z"));
    assert_ne!(updated["updatedAt"], json!("2020-01-01T00:00:00.000Z"));
}

#[tokio::test]
async fn test_update_many_timestamps_every_document() {
    let fixture = FileFixture::new();
    fixture
        .seed("items", docs(json!([{"k": "a"}, {"k": "b"}])))
        .await;
    let items = fixture.store.collection("items", SchemaDefinition::new());

    let updated = items
        .update_many(
            Query::eq("k", "a"),
            UpdatePatch::default().with("v", 1),
            Some(ExtraOptions::new().timestamps(true)),
        )
        .await
        .unwrap();

    assert_eq!(updated[0]["v"], json!(1));
    assert!(updated[0].contains_key("updatedAt"));

    // The unmatched document is not patched but still stamped.
    assert!(!updated[1].contains_key("v"));
    assert!(updated[1].contains_key("updatedAt"));
    assert_eq!(items.find(None, None).await.unwrap(), updated);
}

#[tokio::test]
async fn test_update_many_without_options_leaves_unmatched_untouched() {
    let fixture = FileFixture::new();
    fixture
        .seed("items", docs(json!([{"k": "a"}, {"k": "b"}])))
        .await;
    let items = fixture.store.collection("items", SchemaDefinition::new());

    items
        .update_many(Query::eq("k", "a"), UpdatePatch::default().with("v", 1), None)
        .await
        .unwrap();

    assert_eq!(
        items.find(None, None).await.unwrap(),
        docs(json!([{"k": "a", "v": 1}, {"k": "b"}]))
    );
}

#[tokio::test]
async fn test_find_with_upsert_inserts_nothing_for_stored_documents() {
    let fixture = FileFixture::new();
    let people = fixture.store.collection("people", person_schema());
    people
        .create(doc(json!({"name": "Alice", "age": 30})), None)
        .await
        .unwrap();

    let found = people
        .find(
            Some(Query::eq("name", "Alice")),
            Some(ExtraOptions::new().upsert(true)),
        )
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(people.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn test_return_new_has_no_effect() {
    let fixture = FileFixture::new();
    fixture.seed("items", docs(json!([{"k": "a", "v": 1}]))).await;
    let items = fixture.store.collection("items", SchemaDefinition::new());

    let updated = items
        .find_one_and_update(
            Query::eq("k", "a"),
            UpdatePatch::default().with("v", 2),
            Some(ExtraOptions::new().return_new(true)),
        )
        .await
        .unwrap();

    assert_eq!(updated, doc(json!({"k": "a", "v": 2})));
}
