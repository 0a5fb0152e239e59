//! Typed query construction and execution.
//!
//! A query is built fluently against a record type's declared fields and
//! executed lazily: nothing touches the store until
//! [`QueryBuilder::execute`] runs. Field names and filter value types are
//! checked while the query is being built, so a malformed query never
//! reaches the store.
//!
//! # Query building
//!
//! ```ignore
//! let mut query = repo.builder();
//! let fields = query.fields();
//!
//! query
//!     .filter(fields.get("age")?, FilterOp::Gte, 18)?
//!     .order_by(fields.get("age")?, SortDirection::Asc)
//!     .limit(10);
//!
//! let adults = query.execute().await?;
//! ```
//!
//! Builder methods return the *same* builder (`&mut Self`), not a copy: the
//! chain mutates one shared [`QueryDescriptor`]. [`QueryBuilder::build`]
//! hands out a reference to that live descriptor, so a builder must not be
//! mutated further once the returned description is going to be executed
//! elsewhere.

use std::marker::PhantomData;

use bson::Bson;

use crate::{
    datastore::Datastore,
    error::{DataError, DataResult},
    fields::{FieldHandle, FieldKind, FieldRef},
    record::{Record, decode_snapshots},
};

/// Comparison operators usable in a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Equal to.
    Eq,
    /// Not equal to.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Field value is one of the given values.
    In,
    /// Field value is none of the given values.
    NotIn,
    /// Array field contains the value.
    Contains,
    /// Array field contains any of the given values.
    ContainsAny,
}

impl FilterOp {
    /// Whether this operator takes an array of candidate values rather than
    /// a single value.
    pub fn takes_array(&self) -> bool {
        matches!(self, FilterOp::In | FilterOp::NotIn | FilterOp::ContainsAny)
    }
}

/// Sort direction for an ordering pair. Defaults to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9, earliest to latest).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// One filter constraint: field, operator, comparison value.
#[derive(Debug, Clone)]
pub struct FilterClause {
    /// The serialized field name the constraint applies to.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: Bson,
}

impl FilterClause {
    /// Builds a clause against a typed field handle, checking the value
    /// against the field's declared type.
    ///
    /// Fields whose declared kind is [`FieldKind::Any`] skip the check
    /// entirely. For the membership operators (`In`, `NotIn`,
    /// `ContainsAny`) the value must be an array and every element is
    /// checked against the declared kind.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::TypeMismatch`] before any I/O if the check
    /// fails.
    pub fn checked(field: FieldHandle, op: FilterOp, value: Bson) -> DataResult<Self> {
        if field.kind != FieldKind::Any {
            if op.takes_array() {
                let Bson::Array(items) = &value else {
                    return Err(Self::mismatch(field, value));
                };
                if let Some(item) = items.iter().find(|item| !field.kind.matches(item)) {
                    return Err(Self::mismatch(field, item.clone()));
                }
            } else if !field.kind.matches(&value) {
                return Err(Self::mismatch(field, value));
            }
        }

        Ok(Self { field: field.name.to_string(), op, value })
    }

    fn mismatch(field: FieldHandle, value: Bson) -> DataError {
        DataError::TypeMismatch { field: field.name, expected: field.kind, value }
    }
}

/// One ordering pair for query results.
#[derive(Debug, Clone)]
pub struct OrderBy {
    /// The serialized field name to order by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// The accumulated description of a scan: filter clauses, ordering pairs
/// and an optional result cap, in the order they were added.
///
/// Executing a descriptor does not mutate it. The limit is deliberately
/// unvalidated; a non-positive value is passed through to the store, whose
/// own behavior applies.
#[derive(Debug, Clone, Default)]
pub struct QueryDescriptor {
    /// Filter clauses, combined as a conjunction.
    pub filters: Vec<FilterClause>,
    /// Ordering pairs, applied in sequence.
    pub order_by: Vec<OrderBy>,
    /// Maximum number of results, if capped.
    pub limit: Option<i64>,
}

/// Fluent, lazily-executed query over one collection.
///
/// Obtained from [`Repository::builder`](crate::repository::Repository::builder).
/// The builder owns the evolving [`QueryDescriptor`] and a reference to the
/// backend; a single logical task is expected to build and execute it.
#[derive(Debug)]
pub struct QueryBuilder<'a, B: Datastore, R: Record> {
    backend: &'a B,
    collection: &'a str,
    descriptor: QueryDescriptor,
    _marker: PhantomData<R>,
}

impl<'a, B: Datastore, R: Record> QueryBuilder<'a, B, R> {
    pub(crate) fn new(backend: &'a B, collection: &'a str) -> Self {
        Self {
            backend,
            collection,
            descriptor: QueryDescriptor::default(),
            _marker: PhantomData,
        }
    }

    /// Returns the typed field reference for `R`, for building handles to
    /// pass to [`filter`](Self::filter) and [`order_by`](Self::order_by).
    pub fn fields(&self) -> FieldRef<R> {
        FieldRef::new()
    }

    /// Appends a filter clause, checking `value` against the field's
    /// declared type first.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::TypeMismatch`] synchronously, before any I/O,
    /// if the value does not match a non-`Any` field's declared type.
    pub fn filter(
        &mut self,
        field: FieldHandle,
        op: FilterOp,
        value: impl Into<Bson>,
    ) -> DataResult<&mut Self> {
        let clause = FilterClause::checked(field, op, value.into())?;
        self.descriptor.filters.push(clause);

        Ok(self)
    }

    /// Appends an ordering pair.
    pub fn order_by(&mut self, field: FieldHandle, direction: SortDirection) -> &mut Self {
        self.descriptor.order_by.push(OrderBy {
            field: field.name.to_string(),
            direction,
        });

        self
    }

    /// Sets (or overwrites) the result-count cap.
    ///
    /// The count is not validated; a non-positive value reaches the store
    /// unchanged.
    pub fn limit(&mut self, count: i64) -> &mut Self {
        self.descriptor.limit = Some(count);

        self
    }

    /// Returns the current underlying query description.
    ///
    /// This is the builder's live descriptor, not a copy: keep the builder
    /// unmutated between `build()` and executing the returned description.
    pub fn build(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    /// Runs the scan against the store and decodes the results, in store
    /// order.
    ///
    /// Documents whose raw field map is absent or empty are silently
    /// skipped. No client-side sorting, filtering or pagination is applied
    /// beyond what the descriptor requested.
    ///
    /// # Errors
    ///
    /// Propagates store failures and decode failures.
    pub async fn execute(&self) -> DataResult<Vec<R>> {
        let snapshots = self
            .backend
            .run_query(self.collection, &self.descriptor)
            .await?;

        decode_snapshots(snapshots)
    }
}
