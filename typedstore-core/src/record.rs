//! Core trait and codec for types stored as documents.
//!
//! A record is a serde struct with a string identifier, a pair of
//! timestamps, and a declared-field descriptor table. The codec maps records
//! to and from raw BSON documents; the identifier travels alongside the
//! document (it is the store's document key), never inside it.

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};
use uuid::Uuid;

use crate::{
    datastore::Snapshot,
    error::{DataError, DataResult},
    fields::FieldHandle,
};

/// Core trait for types stored as documents in a named collection.
///
/// Records are expected to carry an `id: String` field plus `created_at`/
/// `updated_at` timestamps (`bson::DateTime`); `updated_at` is stamped by the
/// repository on every update and should not be edited directly. The
/// [`fields`](Record::fields) table declares every serialized field with its
/// type tag and backs the typed query API.
///
/// Usually derived:
///
/// ```ignore
/// use typedstore::Record;
///
/// #[derive(Debug, Clone, Serialize, Deserialize, Record)]
/// #[record(collection = "users")]
/// pub struct User {
///     pub id: String,
///     pub created_at: bson::DateTime,
///     pub updated_at: bson::DateTime,
///     pub name: String,
///     pub age: i64,
/// }
/// ```
pub trait Record: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns this record's identifier.
    fn id(&self) -> &str;

    /// Returns the name of the collection records of this type live in.
    fn collection_name() -> &'static str;

    /// Returns the declared-field descriptor table, one handle per
    /// serialized field.
    fn fields() -> &'static [FieldHandle];
}

/// Generates a fresh document identifier.
///
/// Used both for client-side pre-generation and by backends that assign ids
/// on create.
pub fn auto_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Codec between records and raw documents, blanket-implemented for every
/// [`Record`].
pub trait RecordExt: Record {
    /// Serializes this record to a raw document, excluding the identifier.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the record does not serialize to a
    /// document.
    fn to_document(&self) -> DataResult<Document>;

    /// Rebuilds a record from a raw document and its identifier.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if required fields are missing or have
    /// the wrong shape.
    fn from_document(data: Document, id: &str) -> DataResult<Self>;

    /// Converts this record to a JSON value.
    fn to_json(&self) -> DataResult<Value>;

    /// Rebuilds a record from a JSON value.
    fn from_json(value: Value) -> DataResult<Self>;
}

impl<R: Record> RecordExt for R {
    fn to_document(&self) -> DataResult<Document> {
        let mut data = match serialize_to_bson(self)? {
            Bson::Document(data) => data,
            other => {
                return Err(DataError::InvalidDocument(format!(
                    "record serialized to non-document value: {other:?}"
                )));
            }
        };
        data.remove("id");

        Ok(data)
    }

    fn from_document(mut data: Document, id: &str) -> DataResult<Self> {
        data.insert("id", id);

        Ok(deserialize_from_bson(Bson::Document(data))?)
    }

    fn to_json(&self) -> DataResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> DataResult<Self> {
        Ok(from_value(value)?)
    }
}

/// Decodes scan results, silently skipping snapshots whose raw field map is
/// absent or empty.
pub(crate) fn decode_snapshots<R: Record>(snapshots: Vec<Snapshot>) -> DataResult<Vec<R>> {
    snapshots
        .into_iter()
        .filter_map(|snapshot| match snapshot.data {
            Some(data) if !data.is_empty() => Some(R::from_document(data, &snapshot.id)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldKind;
    use chrono::{TimeZone, Utc};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        created_at: bson::DateTime,
        updated_at: bson::DateTime,
        body: String,
        pinned: bool,
    }

    impl Record for Note {
        fn id(&self) -> &str {
            &self.id
        }

        fn collection_name() -> &'static str {
            "notes"
        }

        fn fields() -> &'static [FieldHandle] {
            &[
                FieldHandle { name: "id", kind: FieldKind::Str },
                FieldHandle { name: "created_at", kind: FieldKind::DateTime },
                FieldHandle { name: "updated_at", kind: FieldKind::DateTime },
                FieldHandle { name: "body", kind: FieldKind::Str },
                FieldHandle { name: "pinned", kind: FieldKind::Bool },
            ]
        }
    }

    fn sample() -> Note {
        let stamp = bson::DateTime::from_chrono(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());

        Note {
            id: auto_id(),
            created_at: stamp,
            updated_at: stamp,
            body: "remember the milk".to_string(),
            pinned: true,
        }
    }

    #[test]
    fn encode_excludes_id() {
        let note = sample();
        let data = note.to_document().unwrap();

        assert!(!data.contains_key("id"));
        assert_eq!(data.get_str("body").unwrap(), "remember the milk");
    }

    #[test]
    fn decode_round_trips_under_a_new_id() {
        let note = sample();
        let data = note.to_document().unwrap();

        let restored = Note::from_document(data, "note-42").unwrap();
        assert_eq!(restored.id, "note-42");
        assert_eq!(restored.body, note.body);
        assert_eq!(restored.pinned, note.pinned);
        assert_eq!(restored.created_at, note.created_at);
    }

    #[test]
    fn decode_missing_field_fails() {
        let mut data = sample().to_document().unwrap();
        data.remove("body");

        assert!(matches!(
            Note::from_document(data, "note-42"),
            Err(DataError::Serialization(_))
        ));
    }

    #[test]
    fn auto_ids_are_unique() {
        assert_ne!(auto_id(), auto_id());
    }
}
