use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::Identity;
use service::storage::{DeleteResult, Document, Fields, UpdateResult};
use service::users::Registration;

use super::auth::ServerState;
use crate::errors::ApiError;

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub admin: bool,
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Inserted, or `{message: \"user already exists\"}`"),
        (status = 400, description = "Body has no email")
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    Json(body): Json<Fields>,
) -> Result<Json<Registration>, ApiError> {
    Ok(Json(state.users.register(body).await?))
}

#[utoipa::path(get, path = "/users", tag = "users", security(("bearer" = [])), responses((status = 200, description = "All users")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.users.list().await?))
}

#[utoipa::path(
    patch,
    path = "/users/admin/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "Role set", body = crate::openapi::UpdateResultDoc))
)]
pub async fn promote(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UpdateResult>, ApiError> {
    Ok(Json(state.users.promote_to_admin(id).await?))
}

/// `GET /users/admin/:email`. Shares the path parameter slot with the
/// promotion route, so the segment arrives as a plain string.
#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    tag = "users",
    security(("bearer" = [])),
    params(("email" = String, Path, description = "Email to check")),
    responses((status = 200, description = "Whether the caller is that admin", body = crate::openapi::AdminStatusDoc))
)]
pub async fn admin_status(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>, ApiError> {
    let admin = state.auth.is_admin(&identity, &email).await?;
    Ok(Json(AdminStatus { admin }))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "Deleted", body = crate::openapi::DeleteResultDoc))
)]
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.users.delete(id).await?))
}
