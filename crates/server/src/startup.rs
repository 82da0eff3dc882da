use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::repo::seaorm::SeaOrmAccountRepository;
use service::auth::{AuthService, TokenService};

use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: build the app and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    let cfg = configs::AppConfig::load_and_validate()?;

    // DB connection; migrations also create the partial unique indexes the
    // registration workflow relies on.
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    // Signing key decoded once from base64; immutable for the process.
    let tokens = Arc::new(TokenService::new(&cfg.jwt.secret, cfg.jwt.expiration_ms)?);
    let repo = Arc::new(SeaOrmAccountRepository { db });
    let state = auth::ServerState {
        auth: Arc::new(AuthService::new(repo, Arc::clone(&tokens))),
        tokens,
    };

    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting identity server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
