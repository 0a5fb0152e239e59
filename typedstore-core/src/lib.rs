//! A typed record and repository layer over document stores.
//!
//! This crate is the core of the typedstore project and provides:
//!
//! - **Record trait and codec** ([`record`]) - serde-backed record types
//!   with id-aside document encoding
//! - **Typed field references** ([`fields`]) - named, type-tagged handles
//!   to a record's declared fields
//! - **Query API** ([`query`]) - fluent filter/order/limit construction
//!   with build-time type checks and lazy execution
//! - **Store boundary** ([`datastore`]) - the async trait the external
//!   document store is driven through
//! - **Repository** ([`repository`]) - CRUD plus simple querying over one
//!   collection
//! - **Error handling** ([`error`]) - error taxonomy and result type
//!
//! # Example
//!
//! ```ignore
//! use typedstore_core::{fields::{FieldHandle, FieldKind}, record::Record};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     pub id: String,
//!     pub created_at: bson::DateTime,
//!     pub updated_at: bson::DateTime,
//!     pub name: String,
//!     pub age: i64,
//! }
//!
//! impl Record for User {
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "users"
//!     }
//!
//!     fn fields() -> &'static [FieldHandle] {
//!         &[
//!             FieldHandle { name: "id", kind: FieldKind::Str },
//!             FieldHandle { name: "created_at", kind: FieldKind::DateTime },
//!             FieldHandle { name: "updated_at", kind: FieldKind::DateTime },
//!             FieldHandle { name: "name", kind: FieldKind::Str },
//!             FieldHandle { name: "age", kind: FieldKind::Int },
//!         ]
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as typedstore_core;

pub mod datastore;
pub mod error;
pub mod fields;
pub mod query;
pub mod record;
pub mod repository;
