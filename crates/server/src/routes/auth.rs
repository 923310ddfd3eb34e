use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde::Deserialize;
use tracing::{debug, warn};

use service::auth::{
    domain::{AccessToken, Identity},
    errors::AuthError,
    repo::document::DocumentUserRepository,
    token::TokenService,
    AuthService,
};
use service::catalog::CatalogService;
use service::orders::OrderService;
use service::reviews::ReviewService;
use service::storage::DocumentStore;
use service::users::UserService;

use crate::errors::ApiError;

/// Everything handlers need, built once at startup.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<DocumentUserRepository>>,
    pub catalog: Arc<CatalogService>,
    pub users: Arc<UserService>,
    pub orders: Arc<OrderService>,
    pub reviews: Arc<ReviewService>,
}

impl ServerState {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: TokenService) -> Self {
        let repo = Arc::new(DocumentUserRepository::new(Arc::clone(&store)));
        Self {
            auth: Arc::new(AuthService::new(repo, tokens)),
            catalog: Arc::new(CatalogService::new(Arc::clone(&store))),
            users: Arc::new(UserService::new(Arc::clone(&store))),
            orders: Arc::new(OrderService::new(Arc::clone(&store))),
            reviews: Arc::new(ReviewService::new(store)),
        }
    }
}

/// Run the authentication stage against raw headers.
///
/// Shared by the `require_identity` middleware and handlers that must decide
/// something before authenticating.
pub fn authenticate_request(state: &ServerState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    state.auth.authenticate(header).map_err(|e| {
        debug!(err = %e, code = e.code(), "authentication rejected");
        ApiError::from(e)
    })
}

/// Authentication guard: verify the bearer token and attach the caller's identity.
pub async fn require_identity(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authenticate_request(&state, req.headers())?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Authorization guard: only identities whose user record has the admin role pass.
pub async fn require_admin(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(identity) = req.extensions().get::<Identity>().cloned() else {
        warn!(path = %req.uri().path(), "admin guard reached without identity");
        return Err(ApiError::Unauthorized);
    };
    if let Err(e) = state.auth.authorize_admin(&identity).await {
        warn!(email = %identity.email, code = e.code(), err = %e, "admin access refused");
        return Err(e.into());
    }
    Ok(next.run(req).await)
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[utoipa::path(
    get,
    path = "/jwt",
    tag = "auth",
    params(("email" = Option<String>, Query, description = "Registered user email")),
    responses(
        (status = 200, description = "Token issued", body = crate::openapi::AccessTokenDoc),
        (status = 403, description = "No user with that email", body = crate::openapi::AccessTokenDoc)
    )
)]
pub async fn issue_jwt(
    State(state): State<ServerState>,
    Query(q): Query<EmailQuery>,
) -> Result<(StatusCode, Json<AccessToken>), ApiError> {
    let Some(email) = q.email.filter(|e| !e.is_empty()) else {
        return Ok((StatusCode::FORBIDDEN, Json(AccessToken::empty())));
    };
    match state.auth.issue_token(&email).await {
        Ok(access_token) => Ok((StatusCode::OK, Json(AccessToken { access_token }))),
        Err(AuthError::NoSuchIdentity) => Ok((StatusCode::FORBIDDEN, Json(AccessToken::empty()))),
        Err(e) => Err(e.into()),
    }
}
