//! Typed references to a record type's declared fields.
//!
//! Query code refers to fields through [`FieldHandle`]s obtained from a
//! [`FieldRef`] instead of raw strings, so an unknown field name fails at
//! build time and filter values can be checked against the field's declared
//! type before a query ever reaches the store.

use std::{any::type_name, fmt, marker::PhantomData};

use bson::Bson;

use crate::{
    error::{DataError, DataResult},
    record::Record,
};

/// Type tag carried by a field handle.
///
/// Only concrete singular scalar types get a precise tag. Containers,
/// optionals, nested records and anything else the schema cannot resolve to
/// a single scalar fall back to [`FieldKind::Any`], which disables the
/// runtime value check for that field. The fallback is a deliberate safety
/// valve, not an error: an `Any` field is still addressable, it is just not
/// type-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 string.
    Str,
    /// Any integer width (BSON int32 or int64).
    Int,
    /// 64-bit float.
    Double,
    /// Boolean.
    Bool,
    /// BSON datetime.
    DateTime,
    /// Unresolved or non-scalar type; value checks are skipped.
    Any,
}

impl FieldKind {
    /// Whether `value`'s runtime BSON type matches this tag.
    pub fn matches(&self, value: &Bson) -> bool {
        match self {
            FieldKind::Str => matches!(value, Bson::String(_)),
            FieldKind::Int => matches!(value, Bson::Int32(_) | Bson::Int64(_)),
            FieldKind::Double => matches!(value, Bson::Double(_)),
            FieldKind::Bool => matches!(value, Bson::Boolean(_)),
            FieldKind::DateTime => matches!(value, Bson::DateTime(_)),
            FieldKind::Any => true,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Str => "string",
            FieldKind::Int => "int",
            FieldKind::Double => "double",
            FieldKind::Bool => "bool",
            FieldKind::DateTime => "datetime",
            FieldKind::Any => "any",
        })
    }
}

/// A named, typed reference to one declared field of a record type.
///
/// Handles are plain `(name, kind)` pairs taken from the record's static
/// descriptor table; they are `Copy` and carry no backend state.
#[derive(Debug, Clone, Copy)]
pub struct FieldHandle {
    /// The field's serialized name, exactly as it appears in stored documents.
    pub name: &'static str,
    /// The field's declared type tag.
    pub kind: FieldKind,
}

/// Typed view over a record type's declared fields.
///
/// A `FieldRef` is zero-sized and stateless; it is created fresh wherever
/// field handles are needed and simply indexes into [`Record::fields`].
///
/// # Example
///
/// ```ignore
/// let fields = repo.fields();
/// let age = fields.get("age")?;
/// assert_eq!(age.name, "age");
/// ```
#[derive(Debug)]
pub struct FieldRef<R: Record> {
    _marker: PhantomData<R>,
}

// Manual impls: the derives would demand the same bounds of `R`, and a
// field reference is a handle regardless of what the record type supports.
impl<R: Record> Default for FieldRef<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Clone for FieldRef<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Record> Copy for FieldRef<R> {}

impl<R: Record> FieldRef<R> {
    /// Creates a field reference for `R`.
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }

    /// Returns the handle for the field named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownField`] naming the record type and the
    /// attempted field if `name` is not declared on `R`.
    pub fn get(&self, name: &str) -> DataResult<FieldHandle> {
        R::fields()
            .iter()
            .copied()
            .find(|field| field.name == name)
            .ok_or_else(|| DataError::UnknownField {
                record: type_name::<R>(),
                field: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Ticket {
        id: String,
        title: String,
        priority: i64,
        tags: Vec<String>,
    }

    impl Record for Ticket {
        fn id(&self) -> &str {
            &self.id
        }

        fn collection_name() -> &'static str {
            "tickets"
        }

        fn fields() -> &'static [FieldHandle] {
            &[
                FieldHandle { name: "id", kind: FieldKind::Str },
                FieldHandle { name: "title", kind: FieldKind::Str },
                FieldHandle { name: "priority", kind: FieldKind::Int },
                FieldHandle { name: "tags", kind: FieldKind::Any },
            ]
        }
    }

    #[test]
    fn get_returns_declared_handle() {
        let fields = FieldRef::<Ticket>::new();

        let title = fields.get("title").unwrap();
        assert_eq!(title.name, "title");
        assert_eq!(title.kind, FieldKind::Str);

        let tags = fields.get("tags").unwrap();
        assert_eq!(tags.kind, FieldKind::Any);
    }

    #[test]
    fn get_unknown_field_fails() {
        let fields = FieldRef::<Ticket>::new();

        let err = fields.get("owner").unwrap_err();
        match err {
            DataError::UnknownField { field, record } => {
                assert_eq!(field, "owner");
                assert!(record.contains("Ticket"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn kind_matching() {
        assert!(FieldKind::Int.matches(&Bson::Int32(7)));
        assert!(FieldKind::Int.matches(&Bson::Int64(7)));
        assert!(!FieldKind::Int.matches(&Bson::String("7".into())));
        assert!(!FieldKind::Double.matches(&Bson::Int64(7)));
        assert!(FieldKind::Any.matches(&Bson::Null));
    }
}
