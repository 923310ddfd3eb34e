pub mod auth;
pub mod orders;
pub mod reviews;
pub mod services;
pub mod users;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put, MethodRouter},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::{Health, LIVENESS_BANNER};

use crate::openapi::ApiDoc;
use auth::{require_admin, require_identity, ServerState};

pub async fn root() -> &'static str {
    LIVENESS_BANNER
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Methods behind the authentication guard.
fn authenticated(state: &ServerState, methods: MethodRouter<ServerState>) -> MethodRouter<ServerState> {
    methods.route_layer(middleware::from_fn_with_state(state.clone(), require_identity))
}

/// Methods behind authentication, then the admin role check.
fn admin_only(state: &ServerState, methods: MethodRouter<ServerState>) -> MethodRouter<ServerState> {
    // the last route_layer runs first
    methods
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_identity))
}

/// Build the full application router: public, authenticated and admin routes.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/jwt", get(auth::issue_jwt));

    let api = Router::new()
        .route(
            "/services",
            get(services::list).merge(admin_only(&state, post(services::create))),
        )
        .route(
            "/services/:id",
            admin_only(&state, put(services::upsert).delete(services::remove)),
        )
        .route(
            "/users",
            post(users::register).merge(admin_only(&state, get(users::list))),
        )
        .route("/users/:id", admin_only(&state, delete(users::remove)))
        .route(
            "/users/admin/:id",
            admin_only(&state, patch(users::promote)).merge(authenticated(&state, get(users::admin_status))),
        )
        .route("/orders", post(orders::place).get(orders::list))
        .route("/reviews", get(reviews::list).post(reviews::submit));

    public
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
