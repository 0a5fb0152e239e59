//! MongoDB datastore implementation.

use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection,
    options::{ClientOptions, FindOptions},
};

use typedstore_core::{
    datastore::{Datastore, DatastoreBuilder, Snapshot},
    error::{DataError, DataResult},
    query::QueryDescriptor,
    record::auto_id,
};

use crate::{
    query::{filter_document, sort_document},
    sanitize::{restore_document, sanitize_document, sanitize_key},
};

/// MongoDB-backed document store.
///
/// Documents are stored one-to-one as MongoDB documents with the layer's
/// string id as `_id`. Field names are escaped for MongoDB's key
/// restrictions on write and restored on read. The client handle is cheap
/// to clone and pools connections internally; the first operation pays the
/// connection cost.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    /// Creates a store over an already-connected client.
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    /// Creates a builder from a connection string and database name.
    pub fn builder(dsn: &str, database: &str) -> MongoStoreBuilder {
        MongoStoreBuilder::new(dsn, database)
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.client
            .database(&self.database)
            .collection(&sanitize_key(name))
    }

    fn prepare(&self, id: &str, data: &Document) -> Document {
        let mut prepared = sanitize_document(data);
        prepared.insert("_id", id);

        prepared
    }

    fn restore(&self, mut data: Document) -> DataResult<(String, Document)> {
        let id = match data.remove("_id") {
            Some(bson::Bson::String(id)) => id,
            other => {
                return Err(DataError::InvalidDocument(format!(
                    "expected string _id, got {other:?}"
                )));
            }
        };

        Ok((id, restore_document(&data)))
    }
}

fn store_err(err: mongodb::error::Error) -> DataError {
    DataError::Store(err.to_string())
}

#[async_trait]
impl Datastore for MongoStore {
    async fn create_document(
        &self,
        collection: &str,
        id: Option<&str>,
        data: Document,
    ) -> DataResult<String> {
        let id = id.map_or_else(auto_id, str::to_string);

        self.collection(collection)
            .insert_one(self.prepare(&id, &data))
            .await
            .map_err(store_err)?;

        Ok(id)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> DataResult<()> {
        let result = self
            .collection(collection)
            .update_one(
                doc! { "_id": id },
                doc! { "$set": sanitize_document(&data) },
            )
            .await
            .map_err(store_err)?;

        if result.matched_count == 0 {
            return Err(DataError::NotFound(id.to_string(), collection.to_string()));
        }

        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> DataResult<()> {
        // Deleting a missing document is a silent success here; that is what
        // the driver reports.
        self.collection(collection)
            .delete_one(doc! { "_id": id })
            .await
            .map_err(store_err)?;

        Ok(())
    }

    async fn get_document(&self, collection: &str, id: &str) -> DataResult<Snapshot> {
        let found = self
            .collection(collection)
            .find_one(doc! { "_id": id })
            .await
            .map_err(store_err)?;

        let data = match found {
            Some(data) => Some(self.restore(data)?.1),
            None => None,
        };

        Ok(Snapshot { id: id.to_string(), data })
    }

    async fn run_query(
        &self,
        collection: &str,
        query: &QueryDescriptor,
    ) -> DataResult<Vec<Snapshot>> {
        let mut options = FindOptions::default();
        if let Some(limit) = query.limit {
            options.limit = Some(limit);
        }
        if !query.order_by.is_empty() {
            options.sort = Some(sort_document(&query.order_by));
        }

        self.collection(collection)
            .find(filter_document(query)?)
            .with_options(options)
            .await
            .map_err(store_err)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(store_err)?
            .into_iter()
            .map(|data| {
                let (id, data) = self.restore(data)?;
                Ok(Snapshot { id, data: Some(data) })
            })
            .collect()
    }
}

/// Builder for [`MongoStore`] instances.
pub struct MongoStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoStoreBuilder {
    /// Creates a builder from a connection string and database name.
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }

    /// Creates a builder from the `MONGODB_URI` and `MONGODB_DATABASE`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an initialization error if either variable is unset.
    pub fn from_env() -> DataResult<Self> {
        let dsn = std::env::var("MONGODB_URI")
            .map_err(|_| DataError::Initialization("MONGODB_URI is not set".to_string()))?;
        let database = std::env::var("MONGODB_DATABASE")
            .map_err(|_| DataError::Initialization("MONGODB_DATABASE is not set".to_string()))?;

        Ok(Self::new(&dsn, &database))
    }
}

#[async_trait]
impl DatastoreBuilder for MongoStoreBuilder {
    type Store = MongoStore;

    async fn build(self) -> DataResult<Self::Store> {
        let options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| DataError::Initialization(e.to_string()))?;
        let client =
            Client::with_options(options).map_err(|e| DataError::Initialization(e.to_string()))?;

        Ok(MongoStore::new(client, self.database))
    }
}
