//! The `reviews` collection.
use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::StorageError;
use crate::storage::{Collection, Document, DocumentStore, Fields, InsertOneResult};

pub struct ReviewService {
    store: Arc<dyn DocumentStore>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    #[instrument(skip(self, review))]
    pub async fn submit(&self, review: Fields) -> Result<InsertOneResult, StorageError> {
        let res = self.store.insert_one(Collection::Reviews, review).await?;
        info!(id = %res.inserted_id, "review_submitted");
        Ok(res)
    }

    pub async fn list(&self) -> Result<Vec<Document>, StorageError> {
        self.store.find_all(Collection::Reviews).await
    }
}
