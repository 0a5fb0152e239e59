//! Backend abstraction over the external document store.
//!
//! The store is an external collaborator: it owns indexing, replication,
//! consistency and the actual evaluation of scans. This module defines the
//! narrow async boundary the rest of the layer speaks (document CRUD plus a
//! filtered/ordered/limited scan) and a factory trait for constructing
//! backends.
//!
//! All methods take only concrete argument types, so the trait is
//! object-safe and `&dyn Datastore` / `Box<dyn Datastore>` work without a
//! separate dynamic-dispatch mirror.

use std::fmt::Debug;

use async_trait::async_trait;
use bson::Document;

use crate::{error::DataResult, query::QueryDescriptor};

/// One scan or lookup result: a document identifier and, when the document
/// exists, its raw field map.
///
/// Absence of the field map on a read is a normal outcome, not an error.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The document's identifier.
    pub id: String,
    /// The raw field map, or `None` when the document does not exist.
    pub data: Option<Document>,
}

impl Snapshot {
    /// Whether the document existed at read time.
    pub fn exists(&self) -> bool {
        self.data.is_some()
    }
}

/// Async interface to a document store backend.
///
/// Implementations must be `Send + Sync`; concurrent use of one handle
/// relies on the backend's own synchronization (the in-memory store locks
/// internally, the MongoDB driver pools connections). The layer above adds
/// no retry, caching, timeout or cancellation policy: every call runs to
/// completion or failure.
#[async_trait]
pub trait Datastore: Send + Sync + Debug {
    /// Creates a document in `collection`.
    ///
    /// When `id` is `None` the store assigns one. Returns the effective
    /// identifier.
    ///
    /// # Errors
    ///
    /// Fails if a document with the given id already exists, or on any
    /// store failure.
    async fn create_document(
        &self,
        collection: &str,
        id: Option<&str>,
        data: Document,
    ) -> DataResult<String>;

    /// Replaces the field map of the document `id` in `collection`.
    ///
    /// # Errors
    ///
    /// Absence of the document surfaces as whatever the store reports,
    /// typically a not-found error.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> DataResult<()>;

    /// Deletes the document `id` from `collection`.
    ///
    /// # Errors
    ///
    /// Absence of the document surfaces as whatever the store reports.
    async fn delete_document(&self, collection: &str, id: &str) -> DataResult<()>;

    /// Fetches the document `id` from `collection`.
    ///
    /// A missing document is returned as a snapshot with `data: None`, not
    /// as an error.
    async fn get_document(&self, collection: &str, id: &str) -> DataResult<Snapshot>;

    /// Runs a filtered/ordered/limited scan over `collection`, returning
    /// snapshots in store order.
    async fn run_query(
        &self,
        collection: &str,
        query: &QueryDescriptor,
    ) -> DataResult<Vec<Snapshot>>;
}

/// Factory trait for constructing a [`Datastore`] backend.
#[async_trait]
pub trait DatastoreBuilder {
    /// The backend this builder produces.
    type Store: Datastore;

    /// Builds the backend, performing whatever connection setup it needs.
    async fn build(self) -> DataResult<Self::Store>;
}
