//! Convenient re-exports of commonly used types from typedstore.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use typedstore::prelude::*;
//! ```

pub use typedstore_core::{
    datastore::{Datastore, DatastoreBuilder, Snapshot},
    error::{DataError, DataResult},
    fields::{FieldHandle, FieldKind, FieldRef},
    query::{FilterClause, FilterOp, OrderBy, QueryBuilder, QueryDescriptor, SortDirection},
    record::{Record, RecordExt, auto_id},
    repository::Repository,
};

pub use typedstore_macros::Record;
