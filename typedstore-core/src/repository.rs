//! Generic repository for CRUD and queries over one record type.
//!
//! A repository binds a record type to its collection and a backend handle,
//! wrapping each store call with encode/decode at the edges. Store failures
//! are logged with the collection name and operation, then propagated
//! unchanged; no retry, no suppression, no partial results.

use std::marker::PhantomData;

use bson::{Bson, DateTime};
use tracing::{error, info};

use crate::{
    datastore::Datastore,
    error::DataResult,
    fields::FieldRef,
    query::{FilterClause, FilterOp, QueryBuilder, QueryDescriptor},
    record::{Record, RecordExt, decode_snapshots},
};

/// Typed repository over one collection of a [`Datastore`].
///
/// Backends are cheaply cloneable handles (the in-memory store shares its
/// state behind an `Arc`, the MongoDB client pools internally), so several
/// repositories typically share clones of one backend. The connection
/// itself is established lazily by the backend on first use and reused; no
/// explicit teardown is modeled here.
///
/// # Example
///
/// ```ignore
/// let repo: Repository<MemoryStore, User> = Repository::new(store.clone());
///
/// let alice = repo.create(&User::new("Alice", 30)).await?;
/// let found = repo.get_by_id(alice.id()).await?;
/// ```
#[derive(Debug)]
pub struct Repository<B: Datastore, R: Record> {
    backend: B,
    collection: String,
    _marker: PhantomData<R>,
}

impl<B: Datastore, R: Record> Repository<B, R> {
    /// Creates a repository over `R`'s declared collection.
    pub fn new(backend: B) -> Self {
        Self::with_collection(backend, R::collection_name())
    }

    /// Creates a repository over an explicitly named collection, for record
    /// types stored under more than one collection.
    pub fn with_collection(backend: B, collection: impl Into<String>) -> Self {
        Self {
            backend,
            collection: collection.into(),
            _marker: PhantomData,
        }
    }

    /// Returns the name of the collection this repository addresses.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the typed field reference for `R`.
    pub fn fields(&self) -> FieldRef<R> {
        FieldRef::new()
    }

    /// Starts a typed query over this repository's collection.
    pub fn builder(&self) -> QueryBuilder<'_, B, R> {
        QueryBuilder::new(&self.backend, &self.collection)
    }

    /// Creates a new document from `record` under a store-assigned id.
    ///
    /// The record's own id is ignored; the returned record carries the id
    /// the store assigned.
    ///
    /// # Errors
    ///
    /// Propagates encode failures and store failures.
    pub async fn create(&self, record: &R) -> DataResult<R> {
        let data = record.to_document()?;

        match self
            .backend
            .create_document(&self.collection, None, data.clone())
            .await
        {
            Ok(id) => {
                info!(collection = %self.collection, id = %id, "created document");
                R::from_document(data, &id)
            }
            Err(err) => {
                error!(collection = %self.collection, error = %err, "failed to create document");
                Err(err)
            }
        }
    }

    /// Fetches one record by id.
    ///
    /// A missing document is a normal outcome and returns `Ok(None)`.
    pub async fn get_by_id(&self, id: &str) -> DataResult<Option<R>> {
        let snapshot = match self.backend.get_document(&self.collection, id).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(collection = %self.collection, id = %id, error = %err, "failed to get document");
                return Err(err);
            }
        };

        match snapshot.data {
            Some(data) => Ok(Some(R::from_document(data, id)?)),
            None => Ok(None),
        }
    }

    /// Replaces the document `id` with `record`, stamping `updated_at` with
    /// the current time.
    ///
    /// Returns the record as persisted, including the fresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Absence of the document surfaces as whatever the store reports.
    pub async fn update(&self, id: &str, record: &R) -> DataResult<R> {
        let mut data = record.to_document()?;
        data.insert("updated_at", DateTime::now());

        match self
            .backend
            .update_document(&self.collection, id, data.clone())
            .await
        {
            Ok(()) => {
                info!(collection = %self.collection, id = %id, "updated document");
                R::from_document(data, id)
            }
            Err(err) => {
                error!(collection = %self.collection, id = %id, error = %err, "failed to update document");
                Err(err)
            }
        }
    }

    /// Deletes the document `id`.
    ///
    /// # Errors
    ///
    /// Absence of the document surfaces as whatever the store reports.
    pub async fn delete(&self, id: &str) -> DataResult<()> {
        match self.backend.delete_document(&self.collection, id).await {
            Ok(()) => {
                info!(collection = %self.collection, id = %id, "deleted document");
                Ok(())
            }
            Err(err) => {
                error!(collection = %self.collection, id = %id, error = %err, "failed to delete document");
                Err(err)
            }
        }
    }

    /// Lists records in store order, optionally capped.
    pub async fn list_all(&self, limit: Option<i64>) -> DataResult<Vec<R>> {
        let query = QueryDescriptor { limit, ..QueryDescriptor::default() };

        self.scan("list", query).await
    }

    /// Finds records where `field` equals `value`.
    ///
    /// The field name is taken as-is; this is the untyped path, with no
    /// schema or value check.
    pub async fn find_by_field(&self, field: &str, value: impl Into<Bson>) -> DataResult<Vec<R>> {
        self.find_by_fields([(field, value)]).await
    }

    /// Finds records matching every `(field, value)` equality pair.
    pub async fn find_by_fields<I, S, V>(&self, fields: I) -> DataResult<Vec<R>>
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Bson>,
    {
        let query = QueryDescriptor {
            filters: fields
                .into_iter()
                .map(|(field, value)| FilterClause {
                    field: field.into(),
                    op: FilterOp::Eq,
                    value: value.into(),
                })
                .collect(),
            ..QueryDescriptor::default()
        };

        self.scan("find", query).await
    }

    /// Executes a query built with [`builder`](Self::builder).
    pub async fn query(&self, builder: &QueryBuilder<'_, B, R>) -> DataResult<Vec<R>> {
        match builder.execute().await {
            Ok(records) => Ok(records),
            Err(err) => {
                error!(collection = %self.collection, error = %err, "failed to execute query");
                Err(err)
            }
        }
    }

    async fn scan(&self, operation: &'static str, query: QueryDescriptor) -> DataResult<Vec<R>> {
        match self.backend.run_query(&self.collection, &query).await {
            Ok(snapshots) => decode_snapshots(snapshots),
            Err(err) => {
                error!(collection = %self.collection, operation, error = %err, "failed to scan collection");
                Err(err)
            }
        }
    }
}
