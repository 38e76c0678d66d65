//! Persistence of already-published article URLs.
//!
//! The collection holds plain `{ "url": ... }` documents. It is only ever read
//! in full and appended to; records are never updated or deleted.

use crate::error::StoreError;
use crate::models::ProcessedRecord;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Client, Collection};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Read-all / append-one view of processed links.
pub trait LinkStore {
    /// Every URL recorded so far.
    async fn seen_urls(&self) -> Result<HashSet<String>, StoreError>;

    /// Record `url` unless it is already present. Returns `true` when a new
    /// record was written.
    async fn record(&self, url: &str) -> Result<bool, StoreError>;
}

/// [`LinkStore`] backed by a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoLinkStore {
    collection: Collection<ProcessedRecord>,
}

impl MongoLinkStore {
    /// Connect and bind to `database.collection`.
    #[instrument(level = "info", skip(connection_string))]
    pub async fn connect(
        connection_string: &str,
        database: &str,
        collection: &str,
    ) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(connection_string).await?;
        let collection = client
            .database(database)
            .collection::<ProcessedRecord>(collection);
        info!("Connected to link store");
        Ok(Self { collection })
    }
}

impl LinkStore for MongoLinkStore {
    #[instrument(level = "info", skip_all)]
    async fn seen_urls(&self) -> Result<HashSet<String>, StoreError> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .projection(doc! { "_id": 0, "url": 1 })
            .await?;

        let mut urls = HashSet::new();
        while let Some(record) = cursor.try_next().await? {
            urls.insert(record.url);
        }
        info!(count = urls.len(), "Loaded processed URLs");
        Ok(urls)
    }

    #[instrument(level = "info", skip(self))]
    async fn record(&self, url: &str) -> Result<bool, StoreError> {
        if self.collection.find_one(doc! { "url": url }).await?.is_some() {
            debug!("URL already recorded");
            return Ok(false);
        }
        self.collection
            .insert_one(ProcessedRecord {
                url: url.to_string(),
            })
            .await?;
        info!("Recorded processed URL");
        Ok(true)
    }
}
