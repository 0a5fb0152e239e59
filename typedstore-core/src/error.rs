//! Error and result types for record store operations.
//!
//! Schema and type-mismatch errors are raised synchronously while a query is
//! being built, before any I/O. Store errors carry whatever the backend
//! reported. Use [`DataResult<T>`] as the return type for fallible operations.

use bson::{Bson, error::Error as BsonError};
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

use crate::fields::FieldKind;

/// Represents all possible errors raised by the record store layer.
#[derive(Error, Debug)]
pub enum DataError {
    /// A field name was looked up that the record type does not declare.
    #[error("no field `{field}` on record type {record}")]
    UnknownField {
        /// The record type the lookup ran against.
        record: &'static str,
        /// The attempted field name.
        field: String,
    },
    /// A filter value's runtime type does not match the field's declared type.
    #[error("value {value:?} does not match declared type {expected} of field `{field}`")]
    TypeMismatch {
        /// The field the filter was built against.
        field: &'static str,
        /// The field's declared type tag.
        expected: FieldKind,
        /// The offending value.
        value: Bson,
    },
    /// Serialization/deserialization error when converting records to or from
    /// raw documents.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("initialization error: {0}")]
    Initialization(String),
    /// A document with the given id already exists in the collection.
    #[error("document {0} already exists in collection {1}")]
    AlreadyExists(String, String),
    /// The store reported a missing document on an update or delete.
    ///
    /// Absence on *read* is not an error; `get_by_id` returns `None` instead.
    #[error("document {0} not found in collection {1}")]
    NotFound(String, String),
    /// The addressed collection does not exist in the store.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),
    /// A raw document has a shape the layer cannot work with.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    /// A failure reported by the underlying store.
    #[error("store error: {0}")]
    Store(String),
}

/// A specialized `Result` type for record store operations.
pub type DataResult<T> = Result<T, DataError>;

impl From<BsonError> for DataError {
    fn from(err: BsonError) -> Self {
        DataError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DataError {
    fn from(err: SerdeJsonError) -> Self {
        DataError::Serialization(err.to_string())
    }
}
