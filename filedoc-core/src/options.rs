//! Per-call extra options and their side effects.
//!
//! [`ExtraOptions`] carries the `upsert`, `new` and `timestamps` switches a caller
//! attaches to a collection operation. [`apply_options`] is the pure rule that
//! decides what each switch does to a document in a given [`Phase`]:
//!
//! | Phase    | `timestamps`                        | `upsert`                                   |
//! |----------|-------------------------------------|--------------------------------------------|
//! | `Create` | stamps `createdAt` and `updatedAt`  |                                            |
//! | `Update` | refreshes `updatedAt`               |                                            |
//! | `Find`   |                                     | requests an insert when `_id` is not stored |
//! | `Delete` |                                     |                                            |
//!
//! `new` is accepted everywhere and changes nothing.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::str::FromStr;

use crate::{
    document::{CREATED_AT_FIELD, Document, ID_FIELD, UPDATED_AT_FIELD, format_timestamp},
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Recognized option keys.
pub const OPTION_KEYS: [&str; 3] = ["upsert", "new", "timestamps"];

/// Named boolean switches altering the side effects of a collection operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtraOptions {
    pub upsert: bool,
    pub new: bool,
    pub timestamps: bool,
}

impl ExtraOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    pub fn return_new(mut self, new: bool) -> Self {
        self.new = new;
        self
    }

    pub fn timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }
}

impl TryFrom<Value> for ExtraOptions {
    type Error = DocumentStoreError;

    /// Parses options from a JSON object such as `{"timestamps": true}`.
    ///
    /// Unknown keys and non-boolean values fail with
    /// [`DocumentStoreError::InvalidOption`].
    fn try_from(value: Value) -> DocumentStoreResult<Self> {
        let Value::Object(map) = value else {
            return Err(DocumentStoreError::InvalidOption(
                "options must be a JSON object".into(),
            ));
        };

        let mut options = ExtraOptions::default();

        for (key, value) in map {
            let Some(enabled) = value.as_bool() else {
                return Err(DocumentStoreError::InvalidOption(format!(
                    "{key} must be a boolean"
                )));
            };

            match key.as_str() {
                "upsert" => options.upsert = enabled,
                "new" => options.new = enabled,
                "timestamps" => options.timestamps = enabled,
                other => {
                    return Err(DocumentStoreError::InvalidOption(format!(
                        "{other} (expected one of {})",
                        OPTION_KEYS.join(", ")
                    )));
                }
            }
        }

        Ok(options)
    }
}

/// The kind of operation options are being applied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Create,
    Update,
    Delete,
    Find,
}

impl FromStr for Phase {
    type Err = DocumentStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Phase::Create),
            "update" => Ok(Phase::Update),
            "delete" => Ok(Phase::Delete),
            "find" => Ok(Phase::Find),
            other => Err(DocumentStoreError::InvalidOperation(other.to_string())),
        }
    }
}

/// A side effect the caller must carry out after applying options.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionEffect {
    /// Insert this document through the normal create path.
    Insert(Document),
}

/// The outcome of [`apply_options`].
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// The document after option rewrites.
    pub document: Document,
    /// A follow-up the caller must perform, if any.
    pub effect: Option<OptionEffect>,
}

/// Applies the options engaged for `phase` to `document`.
///
/// `collection` is the stored collection the document was found in; it is only
/// consulted by `upsert` during [`Phase::Find`]. `now` is the time written by
/// `timestamps`. The function performs no I/O.
pub fn apply_options(
    phase: Phase,
    options: &ExtraOptions,
    mut document: Document,
    collection: &[Document],
    now: DateTime<Utc>,
) -> Applied {
    let mut effect = None;

    if options.timestamps {
        let stamp = Value::String(format_timestamp(now));

        match phase {
            Phase::Create => {
                document.insert(CREATED_AT_FIELD.to_string(), stamp.clone());
                document.insert(UPDATED_AT_FIELD.to_string(), stamp);
            }
            Phase::Update => {
                document.insert(UPDATED_AT_FIELD.to_string(), stamp);
            }
            Phase::Delete | Phase::Find => {}
        }
    }

    if options.upsert && phase == Phase::Find {
        let stored = collection
            .iter()
            .any(|item| item.get(ID_FIELD) == document.get(ID_FIELD));

        if !stored {
            effect = Some(OptionEffect::Insert(document.clone()));
        }
    }

    Applied { document, effect }
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

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn parses_known_keys() {
        let options =
            ExtraOptions::try_from(json!({"upsert": true, "new": false, "timestamps": true}))
                .unwrap();

        assert_eq!(options, ExtraOptions::new().upsert(true).timestamps(true));
    }

    #[test]
    fn rejects_unknown_key() {
        let err = ExtraOptions::try_from(json!({"bogus": true})).unwrap_err();

        assert!(matches!(err, DocumentStoreError::InvalidOption(msg) if msg.starts_with("bogus")));
    }

    #[test]
    fn rejects_non_boolean_value() {
        assert!(matches!(
            ExtraOptions::try_from(json!({"timestamps": "yes"})),
            Err(DocumentStoreError::InvalidOption(_))
        ));
        assert!(matches!(
            ExtraOptions::try_from(json!(true)),
            Err(DocumentStoreError::InvalidOption(_))
        ));
    }

    #[test]
    fn unknown_phase_is_an_invalid_operation() {
        assert_eq!("find".parse::<Phase>().unwrap(), Phase::Find);
        assert!(matches!(
            "replace".parse::<Phase>(),
            Err(DocumentStoreError::InvalidOperation(p)) if p == "replace"
        ));
    }

    #[test]
    fn create_timestamps_stamp_both_fields() {
        let options = ExtraOptions::new().timestamps(true);
        let applied = apply_options(Phase::Create, &options, doc(json!({"k": "a"})), &[], fixed_now());

        assert_eq!(
            Value::Object(applied.document),
            json!({
                "k": "a",
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-01T00:00:00.000Z"
            })
        );
        assert_eq!(applied.effect, None);
    }

    #[test]
    fn update_timestamps_refresh_only_updated_at() {
        let options = ExtraOptions::new().timestamps(true);
        let original = doc(json!({"createdAt": "old", "updatedAt": "old"}));
        let applied = apply_options(Phase::Update, &options, original, &[], fixed_now());

        assert_eq!(applied.document["createdAt"], json!("old"));
        assert_eq!(applied.document["updatedAt"], json!("2024-01-01T00:00:00.000Z"));
    }

    #[test]
    fn disabled_options_change_nothing() {
        let original = doc(json!({"k": "a"}));

        for phase in [Phase::Create, Phase::Update, Phase::Delete, Phase::Find] {
            let applied = apply_options(phase, &ExtraOptions::new(), original.clone(), &[], fixed_now());

            assert_eq!(applied.document, original);
            assert_eq!(applied.effect, None);
        }
    }

    #[test]
    fn upsert_requests_insert_for_unstored_id() {
        let options = ExtraOptions::new().upsert(true);
        let stored = vec![doc(json!({"_id": "a"}))];
        let probe = doc(json!({"_id": "b", "k": 1}));

        let applied = apply_options(Phase::Find, &options, probe.clone(), &stored, fixed_now());

        assert_eq!(applied.effect, Some(OptionEffect::Insert(probe)));
    }

    #[test]
    fn upsert_skips_stored_id() {
        let options = ExtraOptions::new().upsert(true);
        let stored = vec![doc(json!({"_id": "a"}))];

        let applied = apply_options(Phase::Find, &options, doc(json!({"_id": "a"})), &stored, fixed_now());

        assert_eq!(applied.effect, None);
    }

    #[test]
    fn upsert_only_acts_during_find() {
        let options = ExtraOptions::new().upsert(true);

        for phase in [Phase::Create, Phase::Update, Phase::Delete] {
            let applied = apply_options(phase, &options, doc(json!({"_id": "z"})), &[], fixed_now());
            assert_eq!(applied.effect, None);
        }
    }

    #[test]
    fn new_has_no_side_effect() {
        let options = ExtraOptions::new().return_new(true);
        let original = doc(json!({"k": "a"}));

        let applied = apply_options(Phase::Update, &options, original.clone(), &[], fixed_now());

        assert_eq!(applied.document, original);
    }
}
