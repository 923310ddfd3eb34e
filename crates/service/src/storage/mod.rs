//! Storage abstractions for the service layer.
//!
//! A document store addressed by [`Collection`]: find-all, find-by-filter,
//! insert-one, update-one (optional upsert) and delete-one, keyed by UUID.
//! Write operations report driver-style result objects that handlers return
//! to clients unchanged.

pub mod memory;
pub mod seaorm;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub use models::Collection;

use crate::errors::StorageError;

pub use memory::MemoryDocumentStore;
pub use seaorm::SeaOrmDocumentStore;

/// Document fields without the identifier.
pub type Fields = Map<String, Value>;

/// Identifier key as exposed to clients.
pub const ID_FIELD: &str = "_id";

/// A stored document: `_id` plus free-form fields, serialized flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Field-equality filter; a document matches when every listed field equals the given value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Fields);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn matches(&self, fields: &Fields) -> bool {
        self.0.iter().all(|(k, v)| fields.get(k) == Some(v))
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

impl InsertOneResult {
    pub fn new(inserted_id: Uuid) -> Self {
        Self { acknowledged: true, inserted_id }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Uuid>,
}

impl UpdateResult {
    pub fn unmatched() -> Self {
        Self { acknowledged: true, matched_count: 0, modified_count: 0, upserted_count: 0, upserted_id: None }
    }

    pub fn matched(modified: bool) -> Self {
        Self { matched_count: 1, modified_count: u64::from(modified), ..Self::unmatched() }
    }

    pub fn upserted(id: Uuid) -> Self {
        Self { upserted_count: 1, upserted_id: Some(id), ..Self::unmatched() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self { acknowledged: true, deleted_count }
    }
}

/// Document persistence used by every collection service.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, StorageError>;

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StorageError>;

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, StorageError> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    /// Insert `fields` as a new document; any client-supplied `_id` is discarded.
    async fn insert_one(&self, collection: Collection, fields: Fields) -> Result<InsertOneResult, StorageError>;

    /// Set `fields` on the document `id`. With `upsert`, a missing document is created from `fields`.
    async fn update_one(&self, collection: Collection, id: Uuid, fields: Fields, upsert: bool) -> Result<UpdateResult, StorageError>;

    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<DeleteResult, StorageError>;
}

/// Drop the identifier key so callers cannot choose or rewrite ids.
pub(crate) fn without_id(mut fields: Fields) -> Fields {
    fields.remove(ID_FIELD);
    fields
}

/// Apply `set` onto `target`; returns whether any field changed.
pub(crate) fn merge_fields(target: &mut Fields, set: Fields) -> bool {
    let mut changed = false;
    for (k, v) in set {
        if target.get(&k) != Some(&v) {
            target.insert(k, v);
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Fields {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn document_serializes_flat_with_underscore_id() {
        let id = Uuid::new_v4();
        let doc = Document { id, fields: fields(json!({"name": "Logo design"})) };
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["_id"], json!(id));
        assert_eq!(v["name"], "Logo design");
    }

    #[test]
    fn filter_requires_every_field() {
        let f = Filter::new().eq("email", "a@x.com").eq("status", "pending");
        assert!(f.matches(&fields(json!({"email": "a@x.com", "status": "pending", "extra": 1}))));
        assert!(!f.matches(&fields(json!({"email": "a@x.com"}))));
        assert!(Filter::new().matches(&fields(json!({}))));
    }

    #[test]
    fn merge_reports_changes_only() {
        let mut target = fields(json!({"role": "admin", "email": "a@x.com"}));
        assert!(!merge_fields(&mut target, fields(json!({"role": "admin"}))));
        assert!(merge_fields(&mut target, fields(json!({"name": "A"}))));
        assert_eq!(target["name"], "A");
    }

    #[test]
    fn write_results_use_driver_field_names() {
        let id = Uuid::new_v4();
        let v = serde_json::to_value(UpdateResult::upserted(id)).unwrap();
        assert_eq!(v["upsertedId"], json!(id));
        assert_eq!(v["matchedCount"], 0);
        let v = serde_json::to_value(DeleteResult::new(1)).unwrap();
        assert_eq!(v, json!({"acknowledged": true, "deletedCount": 1}));
    }
}
