use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use service::catalog::ServiceFields;
use service::storage::{DeleteResult, Document, Fields, InsertOneResult, UpdateResult};

use super::auth::ServerState;
use crate::errors::ApiError;

#[utoipa::path(get, path = "/services", tag = "services", responses((status = 200, description = "All services")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.catalog.list().await?))
}

#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Inserted", body = crate::openapi::InsertOneResultDoc),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<Fields>,
) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.catalog.create(body).await?))
}

#[utoipa::path(
    put,
    path = "/services/{id}",
    tag = "services",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Service id")),
    request_body = crate::openapi::ServiceFieldsDoc,
    responses(
        (status = 200, description = "Upserted", body = crate::openapi::UpdateResultDoc),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn upsert(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<ServiceFields>,
) -> Result<Json<UpdateResult>, ApiError> {
    Ok(Json(state.catalog.upsert(id, fields).await?))
}

#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "services",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Service id")),
    responses((status = 200, description = "Deleted", body = crate::openapi::DeleteResultDoc))
)]
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.catalog.delete(id).await?))
}
