//! In-memory datastore implementation.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::Document;
use mea::rwlock::RwLock;

use typedstore_core::{
    datastore::{Datastore, DatastoreBuilder, Snapshot},
    error::{DataError, DataResult},
    query::QueryDescriptor,
    record::auto_id,
};

use crate::matching::{compare_documents, matches_all};

type CollectionMap = HashMap<String, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document store.
///
/// Documents are raw BSON field maps keyed by id inside named collections,
/// all behind one async-aware read-write lock. Collections spring into
/// existence on first write. Cloning the store clones a handle; every clone
/// shares the same underlying data.
///
/// Scans walk every document in the collection (there is no indexing), so
/// this backend is meant for development, tests and small datasets. Result
/// order for unordered scans follows map iteration order and is not stable
/// across runs.
#[derive(Default, Clone, Debug)]
pub struct MemoryStore {
    collections: Arc<RwLock<StoreMap>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for constructing a `MemoryStore`.
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn create_document(
        &self,
        collection: &str,
        id: Option<&str>,
        data: Document,
    ) -> DataResult<String> {
        let mut store = self.collections.write().await;
        let documents = store.entry(collection.to_string()).or_default();

        let id = id.map_or_else(auto_id, str::to_string);
        if documents.contains_key(&id) {
            return Err(DataError::AlreadyExists(id, collection.to_string()));
        }
        documents.insert(id.clone(), data);

        Ok(id)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> DataResult<()> {
        let mut store = self.collections.write().await;
        let documents = store
            .get_mut(collection)
            .ok_or_else(|| DataError::CollectionNotFound(collection.to_string()))?;

        if !documents.contains_key(id) {
            return Err(DataError::NotFound(id.to_string(), collection.to_string()));
        }
        documents.insert(id.to_string(), data);

        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> DataResult<()> {
        let mut store = self.collections.write().await;
        let documents = store
            .get_mut(collection)
            .ok_or_else(|| DataError::CollectionNotFound(collection.to_string()))?;

        if documents.remove(id).is_none() {
            return Err(DataError::NotFound(id.to_string(), collection.to_string()));
        }

        Ok(())
    }

    async fn get_document(&self, collection: &str, id: &str) -> DataResult<Snapshot> {
        let store = self.collections.read().await;
        let data = store
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned();

        Ok(Snapshot { id: id.to_string(), data })
    }

    async fn run_query(
        &self,
        collection: &str,
        query: &QueryDescriptor,
    ) -> DataResult<Vec<Snapshot>> {
        let store = self.collections.read().await;
        let Some(documents) = store.get(collection) else {
            return Ok(vec![]);
        };

        let mut rows = documents
            .iter()
            .filter(|(_, data)| matches_all(data, &query.filters))
            .map(|(id, data)| (id.clone(), data.clone()))
            .collect::<Vec<_>>();

        if !query.order_by.is_empty() {
            rows.sort_by(|(_, a), (_, b)| compare_documents(a, b, &query.order_by));
        }

        // A non-positive cap yields nothing; that is this store's own
        // reading of an unvalidated limit.
        if let Some(limit) = query.limit {
            rows.truncate(limit.max(0) as usize);
        }

        Ok(rows
            .into_iter()
            .map(|(id, data)| Snapshot { id, data: Some(data) })
            .collect())
    }
}

/// Builder for [`MemoryStore`] instances.
///
/// Construction cannot fail; the builder exists so the memory backend can
/// stand in wherever a [`DatastoreBuilder`] is expected.
#[derive(Default)]
pub struct MemoryStoreBuilder;

#[async_trait]
impl DatastoreBuilder for MemoryStoreBuilder {
    type Store = MemoryStore;

    async fn build(self) -> DataResult<Self::Store> {
        Ok(MemoryStore::new())
    }
}
