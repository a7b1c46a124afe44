//! Application state and HTTP router construction.
//!
//! Used by `main` and by the integration tests to build the Axum app.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::graphql::BookshelfSchema;
use crate::services::AuthService;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub schema: BookshelfSchema,
    pub auth: AuthService,
}

/// Build the full Axum router: /graphql, health probes, the client fallback
/// in production mode, and the CORS and tracing layers.
pub fn build_app(state: AppState) -> Router<()> {
    let mut app = Router::new()
        .merge(api::health::router())
        .merge(api::graphql::router());

    if state.config.serve_client {
        app = with_client(app, Path::new(&state.config.client_build_dir));
    }

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Serve the pre-built client; unknown paths get its index document so
/// client-side routes resolve.
fn with_client(app: Router<AppState>, client_dir: &Path) -> Router<AppState> {
    tracing::info!(dir = %client_dir.display(), "Serving client build");
    app.fallback_service(
        ServeDir::new(client_dir).fallback(ServeFile::new(client_dir.join("index.html"))),
    )
}

