use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    merge_fields, without_id, Collection, DeleteResult, Document, DocumentStore, Fields, Filter, InsertOneResult,
    UpdateResult,
};
use crate::errors::StorageError;

/// In-process document store.
///
/// Keeps insertion order per collection. Every operation runs under a single
/// lock acquisition, so each one is atomic like its database counterpart.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn len(&self, collection: Collection) -> usize {
        let map = self.inner.read().await;
        map.get(&collection).map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection).await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, StorageError> {
        let map = self.inner.read().await;
        Ok(map.get(&collection).cloned().unwrap_or_default())
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StorageError> {
        let map = self.inner.read().await;
        Ok(map
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(&d.fields)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_one(&self, collection: Collection, fields: Fields) -> Result<InsertOneResult, StorageError> {
        let id = Uuid::new_v4();
        let mut map = self.inner.write().await;
        map.entry(collection).or_default().push(Document { id, fields: without_id(fields) });
        Ok(InsertOneResult::new(id))
    }

    async fn update_one(&self, collection: Collection, id: Uuid, fields: Fields, upsert: bool) -> Result<UpdateResult, StorageError> {
        let fields = without_id(fields);
        let mut map = self.inner.write().await;
        let docs = map.entry(collection).or_default();
        if let Some(doc) = docs.iter_mut().find(|d| d.id == id) {
            let modified = merge_fields(&mut doc.fields, fields);
            return Ok(UpdateResult::matched(modified));
        }
        if !upsert {
            return Ok(UpdateResult::unmatched());
        }
        docs.push(Document { id, fields });
        Ok(UpdateResult::upserted(id))
    }

    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<DeleteResult, StorageError> {
        let mut map = self.inner.write().await;
        let Some(docs) = map.get_mut(&collection) else {
            return Ok(DeleteResult::new(0));
        };
        match docs.iter().position(|d| d.id == id) {
            Some(idx) => {
                docs.remove(idx);
                Ok(DeleteResult::new(1))
            }
            None => Ok(DeleteResult::new(0)),
        }
    }
}
