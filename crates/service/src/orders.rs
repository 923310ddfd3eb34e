//! The `orders` collection.
use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::StorageError;
use crate::storage::{Collection, Document, DocumentStore, Fields, Filter, InsertOneResult};

pub struct OrderService {
    store: Arc<dyn DocumentStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    #[instrument(skip(self, order))]
    pub async fn place(&self, order: Fields) -> Result<InsertOneResult, StorageError> {
        let res = self.store.insert_one(Collection::Orders, order).await?;
        info!(id = %res.inserted_id, "order_placed");
        Ok(res)
    }

    /// Orders whose `email` field equals `email`.
    pub async fn for_customer(&self, email: &str) -> Result<Vec<Document>, StorageError> {
        self.store.find(Collection::Orders, &Filter::new().eq("email", email)).await
    }
}
