use async_trait::async_trait;
use chrono::Utc;
use models::document;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait};
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{
    merge_fields, without_id, Collection, DeleteResult, Document, DocumentStore, Fields, Filter, InsertOneResult,
    UpdateResult,
};
use crate::errors::StorageError;

/// PostgreSQL-backed document store over the shared `document` table.
pub struct SeaOrmDocumentStore {
    pub db: DatabaseConnection,
}

impl SeaOrmDocumentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_document(m: document::Model) -> Result<Document, StorageError> {
    match m.body {
        Value::Object(fields) => Ok(Document { id: m.id, fields }),
        other => Err(StorageError::Corrupt(format!("document {} has non-object body: {}", m.id, other))),
    }
}

fn into_documents(models: Vec<document::Model>) -> Result<Vec<Document>, StorageError> {
    models.into_iter().map(into_document).collect()
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, StorageError> {
        into_documents(document::list(&self.db, collection).await?)
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StorageError> {
        into_documents(document::find_containing(&self.db, collection, filter.to_json()).await?)
    }

    #[instrument(skip(self, body))]
    async fn insert_one(&self, collection: Collection, body: Fields) -> Result<InsertOneResult, StorageError> {
        let id = Uuid::new_v4();
        document::insert(&self.db, collection, id, Value::Object(without_id(body))).await?;
        debug!(%id, "document_inserted");
        Ok(InsertOneResult::new(id))
    }

    /// Read-modify-write under a row lock so concurrent updates of one document serialize.
    #[instrument(skip(self, set))]
    async fn update_one(&self, collection: Collection, id: Uuid, set: Fields, upsert: bool) -> Result<UpdateResult, StorageError> {
        let set = without_id(set);
        let txn = self.db.begin().await?;

        let existing = document::Entity::find_by_id(id)
            .filter(document::Column::Collection.eq(collection.as_str()))
            .lock_exclusive()
            .one(&txn)
            .await?;

        let result = match existing {
            Some(model) => {
                let mut current = into_document(model.clone())?.fields;
                let modified = merge_fields(&mut current, set);
                if modified {
                    let mut am: document::ActiveModel = model.into();
                    am.body = Set(Value::Object(current));
                    am.updated_at = Set(Utc::now().into());
                    am.update(&txn).await?;
                }
                UpdateResult::matched(modified)
            }
            None if upsert => {
                document::insert(&txn, collection, id, Value::Object(set)).await?;
                UpdateResult::upserted(id)
            }
            None => UpdateResult::unmatched(),
        };

        txn.commit().await?;
        debug!(matched = result.matched_count, modified = result.modified_count, upserted = result.upserted_count, "document_updated");
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<DeleteResult, StorageError> {
        let deleted = document::delete_in(&self.db, collection, id).await?;
        Ok(DeleteResult::new(deleted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(body: Value) -> document::Model {
        let now = Utc::now().into();
        document::Model { id: Uuid::new_v4(), collection: "services".into(), body, created_at: now, updated_at: now }
    }

    #[test]
    fn object_bodies_become_documents() {
        let doc = into_document(model(json!({"name": "Logo"}))).unwrap();
        assert_eq!(doc.get_str("name"), Some("Logo"));
    }

    #[test]
    fn non_object_body_is_corruption_not_bad_input() {
        let err = into_document(model(json!([1, 2, 3]))).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)), "{err:?}");
    }
}
