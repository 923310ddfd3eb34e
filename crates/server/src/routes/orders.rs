use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use tracing::warn;

use service::storage::{Document, Fields, InsertOneResult};

use super::auth::{authenticate_request, EmailQuery, ServerState};
use crate::errors::ApiError;

#[utoipa::path(post, path = "/orders", tag = "orders", responses((status = 200, description = "Inserted", body = crate::openapi::InsertOneResultDoc)))]
pub async fn place(
    State(state): State<ServerState>,
    Json(body): Json<Fields>,
) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.orders.place(body).await?))
}

/// Orders belonging to `?email`, which must be the caller's own address.
///
/// Without an email the answer is `[]` before any token is looked at.
#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    security(("bearer" = [])),
    params(("email" = Option<String>, Query, description = "Customer email")),
    responses(
        (status = 200, description = "Orders for the email"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Email is not the caller's")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(q): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let Some(email) = q.email.filter(|e| !e.is_empty()) else {
        return Ok(Json(Vec::new()));
    };
    let identity = authenticate_request(&state, &headers)?;
    if identity.email != email {
        warn!(caller = %identity.email, requested = %email, "order listing for another customer refused");
        return Err(ApiError::Forbidden);
    }
    Ok(Json(state.orders.for_customer(&email).await?))
}
