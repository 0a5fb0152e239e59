//! MongoDB datastore backend for typedstore.
//!
//! This crate implements the `Datastore` trait on top of the async MongoDB
//! driver, mapping the layer's string document ids to `_id` and translating
//! query descriptors to native `find` filters so filtering, ordering and
//! limits run inside MongoDB.
//!
//! To use this backend, enable the `mongodb` feature of the facade crate:
//!
//! ```toml
//! [dependencies]
//! typedstore = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! ```ignore
//! use typedstore::{DatastoreBuilder, mongodb::MongoStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoStore::builder("mongodb://localhost:27017", "app")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! `MongoStoreBuilder::from_env` reads the connection string and database
//! name from `MONGODB_URI` / `MONGODB_DATABASE` instead.

#[allow(unused_extern_crates)]
extern crate self as typedstore_mongodb;

pub mod query;
pub mod sanitize;
pub mod store;

pub use store::{MongoStore, MongoStoreBuilder};
