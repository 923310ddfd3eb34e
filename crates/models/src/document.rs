//! Stored documents.
//!
//! All collections share one table; `collection` scopes every query and the
//! schemaless document sits in `body`.
use chrono::Utc;
use sea_orm::{entity::prelude::*, DbBackend, QueryOrder, Set, Statement};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collection::Collection;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub collection: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub body: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insert `body` into `collection` under `id`.
pub async fn insert<C: ConnectionTrait>(db: &C, collection: Collection, id: Uuid, body: Json) -> Result<Model, ModelError> {
    if !body.is_object() {
        return Err(ModelError::Validation("document body must be a JSON object".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(id),
        collection: Set(collection.as_str().to_string()),
        body: Set(body),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// All documents of a collection in insertion order.
pub async fn list<C: ConnectionTrait>(db: &C, collection: Collection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Collection.eq(collection.as_str()))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Documents whose body contains `filter` (JSONB `@>`), in insertion order.
pub async fn find_containing<C: ConnectionTrait>(db: &C, collection: Collection, filter: Json) -> Result<Vec<Model>, ModelError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"SELECT "id", "collection", "body", "created_at", "updated_at" FROM "document" WHERE "collection" = $1 AND "body" @> $2 ORDER BY "created_at" ASC"#,
        [collection.as_str().into(), filter.into()],
    );
    Ok(Entity::find().from_raw_sql(stmt).all(db).await?)
}

pub async fn find_in<C: ConnectionTrait>(db: &C, collection: Collection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id)
        .filter(Column::Collection.eq(collection.as_str()))
        .one(db)
        .await?)
}

/// Delete by id within a collection; returns the number of rows removed.
pub async fn delete_in<C: ConnectionTrait>(db: &C, collection: Collection, id: Uuid) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::Collection.eq(collection.as_str()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
