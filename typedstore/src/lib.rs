//! Main typedstore crate providing a typed record/repository layer over
//! document stores.
//!
//! This crate is the primary entry point for users of the typedstore
//! framework. It re-exports the core types from the sub-crates and provides
//! access to the storage backends.
//!
//! # Features
//!
//! - **Typed records** - Define records with serde and `#[derive(Record)]`;
//!   ids and timestamps travel with every document
//! - **Typed queries** - Filter/order/limit built against declared fields,
//!   with field names and value types checked before any I/O
//! - **Repositories** - CRUD plus simple querying per collection
//! - **Multiple backends** - In-memory and MongoDB stores behind one trait
//!
//! # Quick Start
//!
//! ```ignore
//! use typedstore::{prelude::*, memory::MemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Record)]
//! #[record(collection = "users")]
//! pub struct User {
//!     pub id: String,
//!     pub created_at: bson::DateTime,
//!     pub updated_at: bson::DateTime,
//!     pub name: String,
//!     pub age: i64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!     let users: Repository<MemoryStore, User> = Repository::new(store);
//!
//!     let alice = users
//!         .create(&User {
//!             id: auto_id(),
//!             created_at: bson::DateTime::now(),
//!             updated_at: bson::DateTime::now(),
//!             name: "Alice".to_string(),
//!             age: 30,
//!         })
//!         .await?;
//!
//!     // Typed query: unknown fields and mistyped values fail before any
//!     // I/O happens.
//!     let mut query = users.builder();
//!     let fields = query.fields();
//!     query
//!         .filter(fields.get("age")?, FilterOp::Gte, 18)?
//!         .order_by(fields.get("name")?, SortDirection::Asc)
//!         .limit(10);
//!
//!     let adults = users.query(&query).await?;
//!     println!("{} adults, including {}", adults.len(), alice.name);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb`
//!   feature)

pub mod prelude;

pub use typedstore_core::{datastore, error, fields, query, record, repository};

pub use typedstore_macros::Record;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use typedstore_memory::{MemoryStore, MemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use typedstore_mongodb::{MongoStore, MongoStoreBuilder};
}
