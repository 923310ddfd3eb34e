use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use service::auth::token::{TokenConfig, TokenService};
use service::storage::{DocumentStore, SeaOrmDocumentStore};

use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router over any document store, signing tokens with the configured secret.
pub fn build_app(store: Arc<dyn DocumentStore>, cfg: &AppConfig) -> Router {
    let tokens = TokenService::new(TokenConfig {
        secret: cfg.auth.token_secret.clone(),
        ttl: cfg.auth.token_ttl(),
    });
    info!(token_ttl_secs = tokens.ttl().map(|ttl| ttl.as_secs()), "token service ready");
    routes::build_router(ServerState::new(store, tokens), build_cors())
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Connect storage, apply migrations and serve until the listener fails.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrations applied");

    let store: Arc<dyn DocumentStore> = Arc::new(SeaOrmDocumentStore::new(db));
    let app = build_app(store, &cfg);

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
