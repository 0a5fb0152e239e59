//! In-memory datastore backend for typedstore.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `Datastore` trait: raw field maps in HashMaps behind an async-aware
//! read-write lock, with full filter/order/limit scan support evaluated in
//! process. It is meant for development, testing and small-scale use.
//!
//! # Quick Start
//!
//! ```ignore
//! use typedstore::{Repository, memory::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!     let users: Repository<MemoryStore, User> = Repository::new(store);
//!
//!     let alice = users.create(&User::new("Alice", 30)).await?;
//!     assert!(users.get_by_id(alice.id()).await?.is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as typedstore_memory;

pub mod matching;
pub mod store;

pub use store::{MemoryStore, MemoryStoreBuilder};
