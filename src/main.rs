//! Bookshelf backend entry point.
//!
//! All data operations are exposed via GraphQL at /graphql.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;

use bookshelf::config::Config;
use bookshelf::db::Database;
use bookshelf::services::{AuthConfig, AuthService, init_tracing};
use bookshelf::{AppState, build_app, graphql};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(config.json_logs);
    let config = Arc::new(config);

    tracing::info!("Starting Bookshelf backend");
    if config.jwt_secret_generated {
        tracing::warn!("JWT_SECRET not set; using a generated per-process secret");
    }

    let db = Database::connect(&config.database_url, config.database_max_connections)
        .await?
        .with_password_cost(config.bcrypt_cost);
    tracing::info!("Database connected");

    let auth = AuthService::new(AuthConfig::from(config.as_ref()));
    let schema = graphql::build_schema(db.clone(), auth.clone());
    tracing::info!("GraphQL schema built");

    let state = AppState {
        config: config.clone(),
        db: db.clone(),
        schema,
        auth,
    };
    let app = build_app(state);

    let ip: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST: {}", config.host))?;
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("HTTP server: bind failed")?;

    tracing::info!("API server running on port {}", config.port);
    tracing::info!("Use GraphQL at http://localhost:{}/graphql", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum::serve")?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
