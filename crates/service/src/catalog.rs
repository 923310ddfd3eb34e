//! The `services` collection: the agency's catalog of offerings.
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::StorageError;
use crate::storage::{Collection, DeleteResult, Document, DocumentStore, Fields, InsertOneResult, UpdateResult};

/// Fields replaced by `PUT /services/:id`. Absent fields are stored as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceFields {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub price: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ServiceFields {
    pub fn into_fields(self) -> Fields {
        let mut m = Map::new();
        m.insert("image".into(), self.image.map_or(Value::Null, Value::from));
        m.insert("name".into(), self.name.map_or(Value::Null, Value::from));
        m.insert("price".into(), self.price.map_or(Value::Null, Value::from));
        m.insert("description".into(), self.description.map_or(Value::Null, Value::from));
        m
    }
}

/// Integer prefix of a string, `"120 USD"` -> 120; `None` when there are no leading digits.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let t = s.trim_start();
    let (sign, digits) = match t.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, t.strip_prefix('+').unwrap_or(t)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Accepts numbers, numeric strings, or anything else as `None`.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => parse_int_prefix(&s),
        _ => None,
    })
}

pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    pub async fn list(&self) -> Result<Vec<Document>, StorageError> {
        self.store.find_all(Collection::Services).await
    }

    #[instrument(skip(self, service))]
    pub async fn create(&self, service: Fields) -> Result<InsertOneResult, StorageError> {
        let res = self.store.insert_one(Collection::Services, service).await?;
        info!(id = %res.inserted_id, "service_created");
        Ok(res)
    }

    /// Replace the catalog fields of `id`, creating the service when absent.
    #[instrument(skip(self, fields))]
    pub async fn upsert(&self, id: Uuid, fields: ServiceFields) -> Result<UpdateResult, StorageError> {
        self.store.update_one(Collection::Services, id, fields.into_fields(), true).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, StorageError> {
        self.store.delete_one(Collection::Services, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDocumentStore;
    use serde_json::json;

    #[test]
    fn int_prefix_parsing() {
        assert_eq!(parse_int_prefix("120"), Some(120));
        assert_eq!(parse_int_prefix("  75.9"), Some(75));
        assert_eq!(parse_int_prefix("-3px"), Some(-3));
        assert_eq!(parse_int_prefix("USD 5"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn price_accepts_numbers_and_strings() {
        let f: ServiceFields = serde_json::from_value(json!({"name": "Web", "price": "250"})).unwrap();
        assert_eq!(f.price, Some(250));
        let f: ServiceFields = serde_json::from_value(json!({"price": 99.5})).unwrap();
        assert_eq!(f.price, Some(99));
        let f: ServiceFields = serde_json::from_value(json!({"price": "free"})).unwrap();
        assert_eq!(f.price, None);
        let f: ServiceFields = serde_json::from_value(json!({})).unwrap();
        assert_eq!(f, ServiceFields::default());
    }

    #[tokio::test]
    async fn upsert_creates_then_overwrites() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryDocumentStore::new());
        let catalog = CatalogService::new(store.clone());
        let id = Uuid::new_v4();

        let created = catalog
            .upsert(id, ServiceFields { name: Some("Logo".into()), price: Some(100), ..Default::default() })
            .await?;
        assert_eq!(created.upserted_id, Some(id));

        let updated = catalog
            .upsert(id, ServiceFields { name: Some("Logo Pro".into()), price: Some(180), ..Default::default() })
            .await?;
        assert_eq!(updated.matched_count, 1);
        assert_eq!(updated.upserted_count, 0);

        let all = catalog.list().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].fields["name"], "Logo Pro");
        assert_eq!(all[0].fields["price"], 180);
        assert_eq!(all[0].fields["image"], Value::Null);
        Ok(())
    }
}
