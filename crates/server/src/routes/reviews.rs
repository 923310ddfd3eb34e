use axum::{extract::State, Json};

use service::storage::{Document, Fields, InsertOneResult};

use super::auth::ServerState;
use crate::errors::ApiError;

#[utoipa::path(get, path = "/reviews", tag = "reviews", responses((status = 200, description = "All reviews")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.reviews.list().await?))
}

#[utoipa::path(post, path = "/reviews", tag = "reviews", responses((status = 200, description = "Inserted", body = crate::openapi::InsertOneResultDoc)))]
pub async fn submit(
    State(state): State<ServerState>,
    Json(body): Json<Fields>,
) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.reviews.submit(body).await?))
}
